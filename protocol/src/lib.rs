// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Dnero Protocol — Transaction Core
//!
//! Builds, encodes and signs transactions for the Dnero network. The output
//! of this crate is a byte string the network accepts as-is, so every
//! encoding decision here is dictated by consensus, not by taste.
//!
//! ## Architecture
//!
//! - **encoding** — The canonical length-prefixed list encoding (RLP) and
//!   strict hex helpers.
//! - **address** — 20-byte account addresses.
//! - **crypto** — Keccak-256, secp256k1 keys and recoverable signatures.
//! - **transaction** — The amount model, the six transaction variants, the
//!   two-stage signing pipeline and the wire-type dispatch.
//! - **network** — JSON-RPC data shapes and the [`network::Provider`] seam
//!   the transport implements. No HTTP lives here.
//! - **wallet** — A key plus an optional provider: sign, send, dry-run.
//! - **config** — Protocol constants and the immutable [`config::ProtocolConfig`].
//!
//! ## Lifecycle
//!
//! 1. Build a variant from its parameters and a [`config::ProtocolConfig`].
//! 2. Compute its sign bytes for a chain id and hash them with Keccak-256.
//! 3. Sign the digest with a [`crypto::PrivateKey`].
//! 4. Serialize `type ∥ fields` with the signature attached and hand the hex
//!    to the transport.
//!
//! Everything up to step 4 is synchronous, pure and free of I/O.

pub mod address;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod network;
pub mod transaction;
pub mod wallet;

pub use address::Address;
pub use config::ProtocolConfig;
pub use crypto::{PrivateKey, RecoverableSignature};
pub use transaction::{Transaction, TransactionError, TxType, TxVariant};
pub use wallet::Wallet;
