//! # Recoverable Signatures
//!
//! The network carries ECDSA signatures as 65 bytes:
//!
//! ```text
//! r (32, big-endian) ∥ s (32, big-endian) ∥ v (1)
//! ```
//!
//! `v` is the curve's recovery id (0 or 1) plus an offset that depends on
//! what was signed: 0 for transactions, 27 for personal messages. The
//! layout is a wire requirement; do not reorder it.

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use super::keys::public_key_to_address;
use super::CryptoError;
use crate::address::Address;

/// Length of the wire form.
pub const SIGNATURE_LENGTH: usize = 65;

/// An ECDSA signature with its recovery byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    r: [u8; 32],
    s: [u8; 32],
    v: u8,
}

impl RecoverableSignature {
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn v(&self) -> u8 {
        self.v
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidSignatureLength(bytes.len()));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// `0x`-prefixed lowercase hex of the 65 wire bytes.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Recovers the signer's address from `digest`.
    ///
    /// `v_offset` must be the offset the signature was produced with.
    pub fn recover_address(&self, digest: &[u8; 32], v_offset: u8) -> Result<Address, CryptoError> {
        let recid = self
            .v
            .checked_sub(v_offset)
            .and_then(RecoveryId::from_byte)
            .ok_or(CryptoError::RecoveryFailed)?;

        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        let signature = Signature::from_slice(&rs).map_err(|_| CryptoError::RecoveryFailed)?;

        let key = VerifyingKey::recover_from_prehash(digest, &signature, recid)
            .map_err(|_| CryptoError::RecoveryFailed)?;
        Ok(public_key_to_address(&key))
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}
