//! # Transaction Module
//!
//! Construction, encoding and signing of the transactions a wallet sends.
//!
//! ## Architecture
//!
//! ```text
//! types.rs       — TxType and StakePurpose discriminators
//! amount.rs      — The DNERO/DTOKEN pair, wei parsing, serde helpers
//! components.rs  — TxInput (signer) and TxOutput (recipient)
//! variant.rs     — The TxVariant trait and the Transaction enum
//! send.rs        — Send
//! stake.rs       — DepositStake, DepositStakeV2, WithdrawStake
//! contract.rs    — SmartContract
//! reward.rs      — StakeRewardDistribution
//! signing.rs     — Sign bytes, signing and serialization
//! factory.rs     — Discriminator dispatch and the JSON envelope
//! error.rs       — TransactionError and its classification
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** from a parameter struct and a [`ProtocolConfig`](crate::config::ProtocolConfig).
//!    Defaults (fee, gas, sequence) are applied here and nowhere else.
//! 2. **Sequence** is optionally reassigned by a wallet that knows the
//!    account's current count.
//! 3. **Sign** with [`sign_transaction`]. The transaction object is not
//!    modified; the signature comes back alongside the raw bytes.
//! 4. **Broadcast** the lowercase hex of the raw bytes.
//!
//! ## Design Decisions
//!
//! - Amounts are arbitrary-precision integers in wei. No floating point
//!   anywhere near monetary values.
//! - Zero integers (amounts, sequence, purpose, split) are encoded as the
//!   empty byte string. The node's decoder rejects `0x00`.
//! - StakeRewardDistribution has its own discriminator (11).

pub mod amount;
pub mod components;
pub mod contract;
pub mod error;
pub mod factory;
pub mod reward;
pub mod send;
pub mod signing;
pub mod stake;
pub mod types;
pub mod variant;

pub use amount::{from_wei, parse_wei, to_wei, Amount, AmountError};
pub use components::{TxInput, TxOutput};
pub use contract::{SmartContractParams, SmartContractTransaction};
pub use error::{ErrorKind, TransactionError};
pub use factory::{from_wire, TxEnvelope};
pub use reward::{StakeRewardDistributionParams, StakeRewardDistributionTransaction};
pub use send::{OutputParams, SendParams, SendTransaction};
pub use signing::{
    raw_bytes, recover_signer, serialize, sign, sign_transaction, signable_bytes,
    SignedTransaction,
};
pub use stake::{
    DepositStakeParams, DepositStakeTransaction, DepositStakeV2Params, DepositStakeV2Transaction,
    HolderSummary, WithdrawStakeParams, WithdrawStakeTransaction,
};
pub use types::{StakePurpose, TxType};
pub use variant::{Transaction, TxVariant};
