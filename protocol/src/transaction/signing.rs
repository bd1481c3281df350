//! The signing pipeline.
//!
//! ```text
//! payload   = rlp(chainId) ∥ rlp(type) ∥ rlp(fields, signatures empty)
//! envelope  = rlp([nonce: "", gasPrice: "", gasLimit: "", to: 0x00…00, value: "", data: payload])
//! digest    = keccak256(envelope)
//! signature = r ∥ s ∥ v           (secp256k1, RFC 6979, low-s, v = recid)
//! raw       = rlp(type) ∥ rlp(fields, signature attached)
//! ```
//!
//! The envelope makes the sign bytes a well-formed Ethereum legacy
//! transaction, so hardware wallets and other tooling that only know that
//! format can display and sign them.
//!
//! Hashing needs every signature slot empty and serializing needs the new
//! signature in the primary slot. Both swaps go through
//! [`SignatureScope`], which puts the previous signatures back when it is
//! dropped, on every exit path. A transaction is never left holding a
//! half-applied signature.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::address::Address;
use crate::config::TX_SIGNATURE_V_OFFSET;
use crate::crypto::{sha3, CryptoError, PrivateKey, RecoverableSignature};
use crate::encoding::RlpItem;

use super::error::TransactionError;
use super::types::TxType;
use super::variant::TxVariant;

// ---------------------------------------------------------------------------
// SignatureScope
// ---------------------------------------------------------------------------

/// Temporarily replaces every signer input's signature. The originals come
/// back on drop.
struct SignatureScope<'a, T: TxVariant + ?Sized> {
    tx: &'a mut T,
    saved: Vec<Vec<u8>>,
}

impl<'a, T: TxVariant + ?Sized> SignatureScope<'a, T> {
    /// All slots empty.
    fn detached(tx: &'a mut T) -> Self {
        let saved = tx
            .signer_inputs_mut()
            .into_iter()
            .map(|input| std::mem::take(&mut input.signature))
            .collect();
        Self { tx, saved }
    }

    /// All slots empty except the primary, which holds `signature`.
    fn attached(tx: &'a mut T, signature: &RecoverableSignature) -> Self {
        let mut scope = Self::detached(tx);
        scope.tx.set_signature(signature.to_bytes().to_vec());
        scope
    }
}

impl<T: TxVariant + ?Sized> Deref for SignatureScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.tx
    }
}

impl<T: TxVariant + ?Sized> DerefMut for SignatureScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.tx
    }
}

impl<T: TxVariant + ?Sized> Drop for SignatureScope<'_, T> {
    fn drop(&mut self) {
        let saved = std::mem::take(&mut self.saved);
        for (input, signature) in self.tx.signer_inputs_mut().into_iter().zip(saved) {
            input.signature = signature;
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// `rlp(type) ∥ rlp(fields)` of `tx` as it stands.
pub fn raw_bytes<T: TxVariant + ?Sized>(tx: &T) -> Vec<u8> {
    let mut out = RlpItem::uint(tx.tx_type().as_u64()).encode();
    tx.to_rlp().encode_to(&mut out);
    out
}

/// Bytes whose Keccak-256 digest gets signed for `chain_id`.
///
/// Takes `&mut` only to blank signature slots while encoding; `tx` is
/// unchanged when this returns.
pub fn signable_bytes<T: TxVariant + ?Sized>(tx: &mut T, chain_id: &str) -> Vec<u8> {
    let scope = SignatureScope::detached(tx);

    let mut payload = RlpItem::string(chain_id).encode();
    payload.extend(raw_bytes(&*scope));

    let envelope = RlpItem::list(vec![
        RlpItem::empty(),
        RlpItem::empty(),
        RlpItem::empty(),
        RlpItem::address(&Address::ZERO),
        RlpItem::empty(),
        RlpItem::bytes(payload),
    ])
    .encode();

    debug!(
        tx_type = %scope.tx_type(),
        chain_id,
        sequence = scope.sequence(),
        len = envelope.len(),
        "computed sign bytes"
    );
    envelope
}

/// Signs `tx` for `chain_id`. The transaction itself is not modified.
pub fn sign<T: TxVariant + ?Sized>(
    tx: &mut T,
    chain_id: &str,
    key: &PrivateKey,
) -> Result<RecoverableSignature, TransactionError> {
    let bytes = signable_bytes(tx, chain_id);
    let digest = sha3(&bytes).ok_or(CryptoError::EmptyDigest)?;
    let signature = key.sign_digest(&digest, TX_SIGNATURE_V_OFFSET)?;
    debug!(tx_type = %tx.tx_type(), chain_id, signer = %key.address(), "signed transaction");
    Ok(signature)
}

/// Raw bytes with `signature` in the primary slot. `tx` is left as it was.
pub fn serialize<T: TxVariant + ?Sized>(tx: &mut T, signature: &RecoverableSignature) -> Vec<u8> {
    let scope = SignatureScope::attached(tx, signature);
    let raw = raw_bytes(&*scope);
    debug!(tx_type = %scope.tx_type(), len = raw.len(), "serialized signed transaction");
    raw
}

/// Recovers the address that produced `signature` over `tx` on `chain_id`.
pub fn recover_signer<T: TxVariant + ?Sized>(
    tx: &mut T,
    chain_id: &str,
    signature: &RecoverableSignature,
) -> Result<Address, TransactionError> {
    let digest = sha3(&signable_bytes(tx, chain_id)).ok_or(CryptoError::EmptyDigest)?;
    Ok(signature.recover_address(&digest, TX_SIGNATURE_V_OFFSET)?)
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// Output of [`sign_transaction`]: what gets broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx_type: TxType,
    pub signature: RecoverableSignature,
    pub raw: Vec<u8>,
}

impl SignedTransaction {
    /// Lowercase hex without a prefix, the form the node's broadcast RPC takes.
    pub fn raw_hex(&self) -> String {
        hex::encode(&self.raw)
    }
}

/// Signs and serializes in one step.
pub fn sign_transaction<T: TxVariant + ?Sized>(
    tx: &mut T,
    chain_id: &str,
    key: &PrivateKey,
) -> Result<SignedTransaction, TransactionError> {
    let signature = sign(tx, chain_id, key)?;
    let raw = serialize(tx, &signature);
    Ok(SignedTransaction {
        tx_type: tx.tx_type(),
        signature,
        raw,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
