//! # Wallet
//!
//! A [`Wallet`] is a private key plus, optionally, a [`Provider`] to reach
//! a node with. Without a provider it can still sign transactions and
//! messages; sending and dry-running need one.
//!
//! ## Sequence Model
//!
//! Every transaction carries the sender's next sequence number, one past the
//! sequence of the account's last committed transaction. When the caller
//! pinned a sequence at construction time [`Wallet::send_transaction`]
//! leaves it alone; otherwise it asks the node and uses `count + 1`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::address::Address;
use crate::config::{MESSAGE_SIGNATURE_V_OFFSET, TX_SIGNATURE_V_OFFSET};
use crate::crypto::{
    hash_message, hash_typed_data, CryptoError, PrivateKey, RecoverableSignature, TypedDataDomain,
    TypedDataError, TypedDataTypes,
};
use crate::network::rpc::{BroadcastResult, CallSmartContractResult};
use crate::network::{Provider, ProviderError};
use crate::transaction::signing::{raw_bytes, sign_transaction};
use crate::transaction::{TransactionError, TxVariant};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet has no provider")]
    NoProvider,

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    TypedData(#[from] TypedDataError),

    /// The dry run executed and the VM reported an error.
    #[error("contract execution failed: {0}")]
    Vm(String),
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Wallet {
    key: PrivateKey,
    provider: Option<Arc<dyn Provider>>,
}

impl Wallet {
    pub fn new(key: PrivateKey) -> Self {
        Self {
            key,
            provider: None,
        }
    }

    pub fn with_provider(key: PrivateKey, provider: Arc<dyn Provider>) -> Self {
        Self {
            key,
            provider: Some(provider),
        }
    }

    /// Same key, different node.
    pub fn connect(&self, provider: Arc<dyn Provider>) -> Self {
        Self::with_provider(self.key.clone(), provider)
    }

    /// Random key, no provider.
    pub fn generate() -> Self {
        Self::new(PrivateKey::generate())
    }

    pub fn address(&self) -> Address {
        self.key.address()
    }

    pub fn provider(&self) -> Option<&Arc<dyn Provider>> {
        self.provider.as_ref()
    }

    fn require_provider(&self) -> Result<&Arc<dyn Provider>, WalletError> {
        self.provider.as_ref().ok_or(WalletError::NoProvider)
    }

    /// Signs `tx` for `chain_id` and returns the raw hex ready to broadcast.
    pub fn sign_transaction<T: TxVariant + ?Sized>(
        &self,
        tx: &mut T,
        chain_id: &str,
    ) -> Result<String, WalletError> {
        Ok(sign_transaction(tx, chain_id, &self.key)?.raw_hex())
    }

    /// Sets the sender to this wallet, fills in the sequence unless the
    /// caller pinned one, signs for the provider's chain and broadcasts.
    pub async fn send_transaction<T: TxVariant + Send + ?Sized>(
        &self,
        tx: &mut T,
    ) -> Result<BroadcastResult, WalletError> {
        let provider = self.require_provider()?;
        let address = self.address();

        tx.set_from(address);
        if tx.sequence_override().is_none() {
            let count = provider.get_transaction_count(&address).await;
            tx.set_sequence(count + 1);
        }

        let raw_hex = self.sign_transaction(tx, provider.chain_id())?;
        let result = provider.broadcast_raw_transaction(&raw_hex).await?;
        info!(
            tx_type = %tx.tx_type(),
            sequence = tx.sequence(),
            hash = %result.hash,
            "broadcast transaction"
        );
        Ok(result)
    }

    /// Runs `tx` unsigned against the node's current state.
    pub async fn call_smart_contract<T: TxVariant + Sync + ?Sized>(
        &self,
        tx: &T,
    ) -> Result<CallSmartContractResult, WalletError> {
        let provider = self.require_provider()?;
        let sctx_hex = hex::encode(raw_bytes(tx));
        debug!(tx_type = %tx.tx_type(), len = sctx_hex.len() / 2, "dry-running contract call");
        Ok(provider.call_smart_contract(&sctx_hex).await?)
    }

    /// Gas a dry run of `tx` used. A VM error is returned as
    /// [`WalletError::Vm`] rather than a gas figure.
    pub async fn estimate_gas<T: TxVariant + Sync + ?Sized>(&self, tx: &T) -> Result<u64, WalletError> {
        let result = self.call_smart_contract(tx).await?;
        if !result.vm_error.is_empty() {
            return Err(WalletError::Vm(result.vm_error));
        }
        Ok(result.gas_used)
    }

    /// Personal-message signature with `v` in {27, 28}.
    pub fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, WalletError> {
        let digest = hash_message(message);
        Ok(self.key.sign_digest(&digest, MESSAGE_SIGNATURE_V_OFFSET)?)
    }

    /// EIP-712 typed-data signature, `v` in {27, 28} like personal messages.
    pub fn sign_typed_data(
        &self,
        domain: &TypedDataDomain,
        types: &TypedDataTypes,
        value: &serde_json::Value,
    ) -> Result<RecoverableSignature, WalletError> {
        let digest = hash_typed_data(domain, types, value)?;
        Ok(self.key.sign_digest(&digest, MESSAGE_SIGNATURE_V_OFFSET)?)
    }

    /// Signs a raw 32-byte digest with the transaction recovery offset.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<RecoverableSignature, WalletError> {
        Ok(self.key.sign_digest(digest, TX_SIGNATURE_V_OFFSET)?)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("provider", &self.provider.as_ref().map(|p| p.chain_id().to_string()))
            .finish()
    }
}

/// Address that produced `signature` over the personal message `message`.
pub fn recover_message_signer(
    message: &[u8],
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    signature.recover_address(&hash_message(message), MESSAGE_SIGNATURE_V_OFFSET)
}

/// Address that produced `signature` over the typed data.
pub fn recover_typed_data_signer(
    domain: &TypedDataDomain,
    types: &TypedDataTypes,
    value: &serde_json::Value,
    signature: &RecoverableSignature,
) -> Result<Address, WalletError> {
    let digest = hash_typed_data(domain, types, value)?;
    Ok(signature.recover_address(&digest, MESSAGE_SIGNATURE_V_OFFSET)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProtocolConfig, CHAIN_ID_PRIVATENET};
    use crate::network::rpc::{AccountResult, RpcError};
    use crate::transaction::{
        OutputParams, SendParams, SendTransaction, SmartContractParams, SmartContractTransaction,
    };
    use async_trait::async_trait;
    use num_bigint::BigUint;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct StubProvider {
        sequence: Option<u64>,
        vm_error: String,
        broadcasts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn chain_id(&self) -> &str {
            CHAIN_ID_PRIVATENET
        }

        async fn get_account(&self, _address: &Address) -> Result<AccountResult, ProviderError> {
            match self.sequence {
                Some(sequence) => Ok(AccountResult {
                    sequence,
                    ..Default::default()
                }),
                None => Err(RpcError::internal_error("account not found").into()),
            }
        }

        async fn broadcast_raw_transaction(
            &self,
            tx_hex: &str,
        ) -> Result<BroadcastResult, ProviderError> {
            self.broadcasts.lock().push(tx_hex.to_string());
            Ok(BroadcastResult {
                hash: "0xabc".into(),
                block: None,
            })
        }

        async fn call_smart_contract(
            &self,
            _sctx_hex: &str,
        ) -> Result<CallSmartContractResult, ProviderError> {
            Ok(CallSmartContractResult {
                gas_used: 21_435,
                vm_error: self.vm_error.clone(),
                ..Default::default()
            })
        }
    }

    fn send(sequence: Option<u64>) -> SendTransaction {
        SendTransaction::new(
            SendParams {
                outputs: vec![OutputParams {
                    address: Some(Address::from_bytes([2; 20])),
                    dnero_wei: BigUint::from(1u8),
                    ..Default::default()
                }],
                sequence,
                ..Default::default()
            },
            &ProtocolConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn send_uses_next_sequence_and_own_address() {
        let provider = Arc::new(StubProvider {
            sequence: Some(4),
            ..Default::default()
        });
        let wallet = Wallet::with_provider(PrivateKey::generate(), provider.clone());
        let mut tx = send(None);

        let result = wallet.send_transaction(&mut tx).await.unwrap();
        assert_eq!(result.hash, "0xabc");
        assert_eq!(tx.sequence(), 5);
        assert_eq!(tx.from_address(), Some(wallet.address()));
        assert_eq!(provider.broadcasts.lock().len(), 1);
    }

    #[tokio::test]
    async fn pinned_sequence_is_kept() {
        let provider = Arc::new(StubProvider {
            sequence: Some(4),
            ..Default::default()
        });
        let wallet = Wallet::with_provider(PrivateKey::generate(), provider);
        let mut tx = send(Some(17));
        wallet.send_transaction(&mut tx).await.unwrap();
        assert_eq!(tx.sequence(), 17);
    }

    #[tokio::test]
    async fn unknown_account_counts_as_zero() {
        let wallet = Wallet::with_provider(PrivateKey::generate(), Arc::new(StubProvider::default()));
        let mut tx = send(None);
        wallet.send_transaction(&mut tx).await.unwrap();
        assert_eq!(tx.sequence(), 1);
    }

    #[tokio::test]
    async fn sending_without_provider_fails() {
        let wallet = Wallet::generate();
        let err = wallet.send_transaction(&mut send(None)).await.unwrap_err();
        assert!(matches!(err, WalletError::NoProvider));
    }

    #[tokio::test]
    async fn estimate_gas_reports_vm_errors() {
        let tx = SmartContractTransaction::new(SmartContractParams::default(), &ProtocolConfig::default())
            .unwrap();

        let ok = Wallet::with_provider(PrivateKey::generate(), Arc::new(StubProvider::default()));
        assert_eq!(ok.estimate_gas(&tx).await.unwrap(), 21_435);

        let failing = Wallet::with_provider(
            PrivateKey::generate(),
            Arc::new(StubProvider {
                vm_error: "execution reverted".into(),
                ..Default::default()
            }),
        );
        let err = failing.estimate_gas(&tx).await.unwrap_err();
        assert!(matches!(err, WalletError::Vm(msg) if msg == "execution reverted"));
    }

    #[test]
    fn message_signatures_use_offset_27() {
        let wallet = Wallet::generate();
        let signature = wallet.sign_message(b"hello dnero").unwrap();
        assert!(signature.v() == 27 || signature.v() == 28);
        assert_eq!(
            recover_message_signer(b"hello dnero", &signature).unwrap(),
            wallet.address()
        );
    }

    #[test]
    fn typed_data_signature_recovers_signer() {
        // Private key keccak256("cow") signs the canonical Ether Mail example.
        let wallet = Wallet::new(
            PrivateKey::from_hex("c85ef7d79691fe79573b1a7064c19c1a9819ebdbd1faaab1a8ec92344438aaf4")
                .unwrap(),
        );
        assert_eq!(
            wallet.address(),
            "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826".parse::<Address>().unwrap()
        );

        let domain: TypedDataDomain = serde_json::from_value(serde_json::json!({
            "name": "Ether Mail",
            "version": "1",
            "chainId": 1,
            "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
        }))
        .unwrap();
        let types: TypedDataTypes = serde_json::from_value(serde_json::json!({
            "Person": [
                {"name": "name", "type": "string"},
                {"name": "wallet", "type": "address"}
            ],
            "Mail": [
                {"name": "from", "type": "Person"},
                {"name": "to", "type": "Person"},
                {"name": "contents", "type": "string"}
            ]
        }))
        .unwrap();
        let mail = serde_json::json!({
            "from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"},
            "to": {"name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"},
            "contents": "Hello, Bob!"
        });

        let signature = wallet.sign_typed_data(&domain, &types, &mail).unwrap();
        assert!(signature.v() == 27 || signature.v() == 28);
        assert_eq!(
            recover_typed_data_signer(&domain, &types, &mail, &signature).unwrap(),
            wallet.address()
        );

        let mut tampered = mail.clone();
        tampered["contents"] = serde_json::json!("Hello, Eve!");
        assert_ne!(
            recover_typed_data_signer(&domain, &types, &tampered, &signature).unwrap(),
            wallet.address()
        );
    }

    #[test]
    fn typed_data_errors_surface() {
        let wallet = Wallet::generate();
        let err = wallet
            .sign_typed_data(&TypedDataDomain::default(), &TypedDataTypes::new(), &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, WalletError::TypedData(TypedDataError::NoPrimaryType)));
    }

    #[test]
    fn debug_hides_key() {
        let wallet = Wallet::generate();
        let debug = format!("{wallet:?}");
        assert!(debug.contains(&wallet.address().to_string()));
        assert!(!debug.contains(&hex::encode(*wallet.key.to_bytes())));
    }
}
