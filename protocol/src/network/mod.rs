//! # Network Module
//!
//! What the library needs to know about talking to a node, minus the
//! talking.
//!
//! ```text
//! rpc.rs       — JSON-RPC method names, request/response and payload types
//! provider.rs  — The async Provider trait a transport implements
//! ```
//!
//! No HTTP lives here. Transports are supplied by the application, which
//! keeps this crate usable from a hardware-wallet bridge or a test harness
//! alike.

pub mod provider;
pub mod rpc;

pub use provider::{Provider, ProviderError};
pub use rpc::{RpcError, RpcMethod, RpcRequest, RpcResponse};
