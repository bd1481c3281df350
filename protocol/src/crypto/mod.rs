//! # Cryptographic Primitives
//!
//! Everything that touches a key or a digest goes through here:
//!
//! - **Keccak-256** for transaction and message digests, and for deriving
//!   addresses from public keys.
//! - **EIP-712 typed data** digests for structured-message signatures.
//! - **secp256k1 ECDSA** with recoverable signatures. Nonces are RFC 6979
//!   deterministic and `s` is normalized to the low half of the curve order,
//!   so the same key and digest always produce the same 65 bytes.
//!
//! Everything here is a thin wrapper around `k256` and `tiny-keccak`. The
//! wrappers exist to pin down byte layouts (`r ∥ s ∥ v`, 20-byte addresses)
//! and to keep key material out of logs.

pub mod hash;
pub mod keys;
pub mod signatures;
pub mod typed_data;

use thiserror::Error;

pub use hash::{hash_message, keccak256, sha3, EMPTY_KECCAK256};
pub use keys::PrivateKey;
pub use signatures::RecoverableSignature;
pub use typed_data::{hash_typed_data, TypedDataDomain, TypedDataError, TypedDataTypes};

/// Failures in the key and signature engine.
///
/// None of these carry key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid private key: expected 32 bytes encoding a scalar in [1, n)")]
    InvalidPrivateKey,

    #[error("refusing to sign the digest of empty input")]
    EmptyDigest,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("public key recovery failed")]
    RecoveryFailed,
}
