//! # JSON-RPC API Definitions
//!
//! Request, response and payload types for the node's JSON-RPC 2.0 API.
//! There is no client here: a transport serializes an [`RpcRequest`], posts
//! it, and hands the body back as an [`RpcResponse`].
//!
//! ## Method Index
//!
//! | Method                                | Params            | Result                     |
//! |---------------------------------------|-------------------|----------------------------|
//! | `dnero.GetAccount`                    | address, preview  | [`AccountResult`]          |
//! | `dnero.BroadcastRawTransaction`       | tx_bytes          | [`BroadcastResult`]        |
//! | `dnero.BroadcastRawTransactionAsync`  | tx_bytes          | [`BroadcastResult`]        |
//! | `dnero.CallSmartContract`             | sctx_bytes        | [`CallSmartContractResult`]|
//! | `dnero.GetTransaction`                | hash              | raw JSON                   |
//! | `dnero.GetBlock`                      | hash              | raw JSON                   |
//! | `dnero.GetBlockByHeight`              | height            | raw JSON                   |
//! | `dnero.GetStatus`                     | —                 | [`StatusResult`]           |
//!
//! The node writes most integers as decimal strings. Payload types accept
//! either form.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// RPC Method Enumeration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpcMethod {
    #[serde(rename = "dnero.GetAccount")]
    GetAccount,
    /// Waits for the transaction to be included in a block.
    #[serde(rename = "dnero.BroadcastRawTransaction")]
    BroadcastRawTransaction,
    /// Returns as soon as the node has accepted the transaction.
    #[serde(rename = "dnero.BroadcastRawTransactionAsync")]
    BroadcastRawTransactionAsync,
    /// Executes an unsigned contract call without committing it.
    #[serde(rename = "dnero.CallSmartContract")]
    CallSmartContract,
    #[serde(rename = "dnero.GetTransaction")]
    GetTransaction,
    #[serde(rename = "dnero.GetBlock")]
    GetBlock,
    #[serde(rename = "dnero.GetBlockByHeight")]
    GetBlockByHeight,
    #[serde(rename = "dnero.GetStatus")]
    GetStatus,
}

// ---------------------------------------------------------------------------
// RPC Request / Response
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    pub method: RpcMethod,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(id: serde_json::Value, method: RpcMethod, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method,
            params,
        }
    }

    /// A request whose params are a typed payload.
    pub fn with_params<P: Serialize>(
        id: u64,
        method: RpcMethod,
        params: &P,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(id.into(), method, serde_json::to_value(params)?))
    }
}

/// A JSON-RPC 2.0 response. A conforming node sets exactly one of
/// `result` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// The typed result, or the node's error.
    ///
    /// A response with neither field, or a result that does not fit `T`,
    /// becomes an internal error.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, RpcError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let result = self
            .result
            .ok_or_else(|| RpcError::internal_error("response has neither result nor error"))?;
        serde_json::from_value(result).map_err(|e| RpcError::internal_error(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RPC Errors
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 error object.
///
/// Standard codes:
/// - `-32700`: Parse error
/// - `-32600`: Invalid request
/// - `-32601`: Method not found
/// - `-32602`: Invalid params
/// - `-32603`: Internal error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("rpc error {code}: {message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::with_code(-32700, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_code(-32600, msg)
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::with_code(-32601, format!("method not found: {}", method.into()))
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::with_code(-32602, msg)
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::with_code(-32603, msg)
    }

    fn with_code(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            data: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Typed Params
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountParams {
    pub address: String,
    /// Read from the uncommitted state.
    #[serde(default)]
    pub preview: bool,
}

/// Params of both broadcast methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRawTransactionParams {
    /// Lowercase hex, no prefix.
    pub tx_bytes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSmartContractParams {
    /// Unsigned raw transaction, lowercase hex, no prefix.
    pub sctx_bytes: String,
}

/// Params of `GetTransaction` and `GetBlock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockByHeightParams {
    #[serde(with = "u64_string")]
    pub height: u64,
}

// ---------------------------------------------------------------------------
// Typed Results
// ---------------------------------------------------------------------------

/// Balances as the node reports them, decimal wei strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCoins {
    #[serde(default)]
    pub dnerowei: String,
    #[serde(default)]
    pub dtokenwei: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResult {
    /// Sequence of the last committed transaction from this account.
    #[serde(with = "u64_string")]
    pub sequence: u64,
    #[serde(default)]
    pub coins: AccountCoins,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSmartContractResult {
    #[serde(default)]
    pub vm_return: String,
    #[serde(default)]
    pub contract_address: String,
    #[serde(default, with = "u64_string")]
    pub gas_used: u64,
    /// Empty when execution succeeded.
    #[serde(default)]
    pub vm_error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default, with = "u64_string")]
    pub current_height: u64,
    #[serde(default, with = "u64_string")]
    pub latest_finalized_block_height: u64,
}

/// Integers the node writes as strings. Accepts a JSON number too.
mod u64_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Str(String),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(n),
            Repr::Str(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }
}
