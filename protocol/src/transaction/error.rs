//! Transaction errors and their coarse classification.

use thiserror::Error;

use crate::address::AddressError;
use crate::crypto::CryptoError;
use crate::encoding::RlpError;

use super::amount::AmountError;
use super::types::StakePurpose;

/// Which kind of failure an error is, for callers that branch on it.
///
/// `Validation` is the caller's input. `Encoding` is a decoder that was
/// handed bytes this crate would never produce. `Crypto` is the key or the
/// signer. `ProtocolMismatch` is a type discriminator this build does not
/// know, which batch callers usually log and skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Encoding,
    Crypto,
    ProtocolMismatch,
}

/// Errors from building, dispatching, signing or serializing a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("invalid hex in {field}: {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    /// Lengths count hex characters including the `0x` prefix.
    #[error("holder summary for purpose {purpose} must be {expected} characters, got {actual}")]
    HolderSummaryLength {
        purpose: StakePurpose,
        expected: usize,
        actual: usize,
    },

    #[error("a send transaction needs at least one output")]
    NoOutputs,

    #[error("malformed transaction data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized transaction type {0}")]
    UnrecognizedType(u64),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Rlp(#[from] RlpError),
}

impl TransactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Address(_)
            | Self::Amount(_)
            | Self::Hex { .. }
            | Self::HolderSummaryLength { .. }
            | Self::NoOutputs
            | Self::Json(_) => ErrorKind::Validation,
            Self::Rlp(_) => ErrorKind::Encoding,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::UnrecognizedType(_) => ErrorKind::ProtocolMismatch,
        }
    }

    pub fn is_unrecognized_type(&self) -> bool {
        matches!(self, Self::UnrecognizedType(_))
    }

    pub(crate) fn hex(field: &'static str, source: hex::FromHexError) -> Self {
        Self::Hex { field, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(TransactionError::NoOutputs.kind(), ErrorKind::Validation);
        assert_eq!(
            TransactionError::hex("data", hex::FromHexError::OddLength).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            TransactionError::from(RlpError::UnexpectedEof).kind(),
            ErrorKind::Encoding
        );
        assert_eq!(
            TransactionError::from(CryptoError::InvalidPrivateKey).kind(),
            ErrorKind::Crypto
        );
        let unknown = TransactionError::UnrecognizedType(3);
        assert_eq!(unknown.kind(), ErrorKind::ProtocolMismatch);
        assert!(unknown.is_unrecognized_type());
    }

    #[test]
    fn holder_summary_message_names_purpose() {
        let err = TransactionError::HolderSummaryLength {
            purpose: StakePurpose::EliteEdge,
            expected: 524,
            actual: 460,
        };
        assert_eq!(
            err.to_string(),
            "holder summary for purpose elite edge must be 524 characters, got 460"
        );
    }
}
