//! # Key Management
//!
//! secp256k1 private keys and the addresses derived from them.
//!
//! A [`PrivateKey`] is the only thing in this crate that can authorize a
//! transaction. It deliberately has no `Serialize`, no `Display`, and a
//! `Debug` that shows the derived address instead of the scalar. Exporting
//! key bytes is possible via [`PrivateKey::to_bytes`], but you have to ask.
//!
//! Key bytes are never logged. Hex buffers decoded on the way in are
//! zeroized before they are dropped.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::hash::keccak256;
use super::signatures::RecoverableSignature;
use super::CryptoError;
use crate::address::Address;
use crate::encoding::hex::strip_hex_prefix;

/// A secp256k1 signing key.
///
/// `k256` zeroizes the scalar on drop.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Key from 32 big-endian bytes. Zero and values `>= n` are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        SigningKey::from_slice(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| CryptoError::InvalidPrivateKey)
    }

    /// Key from 64 hex characters, `0x` prefix optional.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let digits = strip_hex_prefix(hex_str.trim());
        let bytes = Zeroizing::new(hex::decode(digits).map_err(|_| CryptoError::InvalidPrivateKey)?);
        Self::from_bytes(&bytes)
    }

    /// The raw scalar. Wrapped so it is wiped when the caller drops it.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.inner.verifying_key()
    }

    /// Last 20 bytes of Keccak-256 over the uncompressed public key,
    /// without its `0x04` tag.
    pub fn address(&self) -> Address {
        public_key_to_address(self.inner.verifying_key())
    }

    /// Signs a 32-byte digest.
    ///
    /// The recovery byte is `v_offset + recid`; pass
    /// [`TX_SIGNATURE_V_OFFSET`](crate::config::TX_SIGNATURE_V_OFFSET) for
    /// transactions and
    /// [`MESSAGE_SIGNATURE_V_OFFSET`](crate::config::MESSAGE_SIGNATURE_V_OFFSET)
    /// for personal messages.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
        v_offset: u8,
    ) -> Result<RecoverableSignature, CryptoError> {
        let (signature, recovery_id) = self
            .inner
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let (r, s) = signature.split_bytes();
        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&r);
        s_bytes.copy_from_slice(&s);

        Ok(RecoverableSignature::new(
            r_bytes,
            s_bytes,
            v_offset.wrapping_add(recovery_id.to_byte()),
        ))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.verifying_key() == other.verifying_key()
    }
}

impl Eq for PrivateKey {}

/// Address of a public key.
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::from_bytes(address)
}
