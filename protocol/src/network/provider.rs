//! The transport seam.
//!
//! A [`Provider`] is whatever can reach a node: an HTTP client, a partner
//! vault proxy, a mock in tests. Signing needs none of it; the wallet uses
//! it to look up sequences, broadcast, and dry-run contract calls.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use super::rpc::{AccountResult, BroadcastResult, CallSmartContractResult, RpcError};
use crate::address::Address;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The node answered with a JSON-RPC error.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The node could not be reached or the body could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Chain id the node serves; signatures are bound to it.
    fn chain_id(&self) -> &str;

    async fn get_account(&self, address: &Address) -> Result<AccountResult, ProviderError>;

    /// Submits lowercase, unprefixed raw transaction hex.
    async fn broadcast_raw_transaction(&self, tx_hex: &str)
        -> Result<BroadcastResult, ProviderError>;

    /// Executes unsigned raw transaction hex without committing it.
    async fn call_smart_contract(
        &self,
        sctx_hex: &str,
    ) -> Result<CallSmartContractResult, ProviderError>;

    /// Sequence of the account's last transaction. An account the node has
    /// never seen has no state at all, so any lookup failure counts as 0.
    async fn get_transaction_count(&self, address: &Address) -> u64 {
        match self.get_account(address).await {
            Ok(account) => account.sequence,
            Err(err) => {
                warn!(%address, error = %err, "account lookup failed, assuming sequence 0");
                0
            }
        }
    }
}
