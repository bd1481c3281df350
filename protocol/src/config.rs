//! # Protocol Configuration & Constants
//!
//! Every magic number the encoder and signer depend on lives here. Most of
//! them are fixed by the network: change one and the node starts rejecting
//! what we produce.
//!
//! The tunable defaults (fees, gas) are gathered into [`ProtocolConfig`],
//! an immutable value passed into every transaction constructor. There is
//! no global mutable state to forget about.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::transaction::amount::serde_wei;

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Mainnet. Signatures are bound to this string, not to a number.
pub const CHAIN_ID_MAINNET: &str = "mainnet";

/// Public testnet.
pub const CHAIN_ID_TESTNET: &str = "testnet";

/// Sapphire testnet.
pub const CHAIN_ID_TESTNET_SAPPHIRE: &str = "testnet_sapphire";

/// Smart-contract sandbox.
pub const CHAIN_ID_PRIVATENET: &str = "privatenet";

/// Elite edge testnet.
pub const CHAIN_ID_ELITE_EDGE_TESTNET: &str = "testnet_amber";

/// All chain ids this build knows about.
pub const KNOWN_CHAIN_IDS: [&str; 5] = [
    CHAIN_ID_MAINNET,
    CHAIN_ID_TESTNET,
    CHAIN_ID_TESTNET_SAPPHIRE,
    CHAIN_ID_PRIVATENET,
    CHAIN_ID_ELITE_EDGE_TESTNET,
];

// ---------------------------------------------------------------------------
// Denominations
// ---------------------------------------------------------------------------

/// Decimal places of both assets. 1 DNERO = 10^18 DneroWei, same for DTOKEN.
pub const UNIT_DECIMALS: u32 = 18;

/// 10^18 — wei per whole unit.
pub const TEN_18: u64 = 1_000_000_000_000_000_000;

// ---------------------------------------------------------------------------
// Fee & Gas Defaults
// ---------------------------------------------------------------------------

/// Default fee for Send and staking transactions: 0.3 DTOKEN, in wei.
pub const GAS_PRICE_DEFAULT_WEI: u64 = 300_000_000_000_000_000;

/// Default gas price for smart-contract calls: 0.000004 DTOKEN, in wei.
pub const GAS_PRICE_SMART_CONTRACT_DEFAULT_WEI: u64 = 4_000_000_000_000;

/// Default gas limit for smart-contract calls.
pub const GAS_LIMIT_DEFAULT: u64 = 10_000_000;

/// Sequence assigned when the caller does not pin one.
pub const DEFAULT_SEQUENCE: u64 = 1;

// ---------------------------------------------------------------------------
// Layout Constants
// ---------------------------------------------------------------------------

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// `0x`-prefixed hex length of a validator/sentry holder summary (229 bytes).
pub const HOLDER_SUMMARY_HEX_LEN: usize = 460;

/// `0x`-prefixed hex length of an elite edge holder summary (261 bytes).
pub const ELITE_EDGE_HOLDER_SUMMARY_HEX_LEN: usize = 524;

/// Prefix for personal-message signing. Kept identical to Ethereum so
/// wallets and verifiers built for it interoperate.
pub const MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Recovery-id offset applied to transaction signatures.
pub const TX_SIGNATURE_V_OFFSET: u8 = 0;

/// Recovery-id offset applied to personal-message signatures.
pub const MESSAGE_SIGNATURE_V_OFFSET: u8 = 27;

// ---------------------------------------------------------------------------
// ProtocolConfig
// ---------------------------------------------------------------------------

/// Defaults applied when a transaction's parameters leave a field out.
///
/// Constructed once and shared by reference. Loading it from JSON only
/// overrides the fields present; everything else keeps the network default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolConfig {
    /// Fee for Send, staking and reward-distribution transactions.
    #[serde(with = "serde_wei")]
    pub gas_price_default: BigUint,

    /// Gas price for smart-contract calls.
    #[serde(with = "serde_wei")]
    pub gas_price_smart_contract_default: BigUint,

    /// Gas limit for smart-contract calls.
    pub gas_limit_default: u64,

    /// Sequence assigned when none is given.
    pub default_sequence: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            gas_price_default: BigUint::from(GAS_PRICE_DEFAULT_WEI),
            gas_price_smart_contract_default: BigUint::from(GAS_PRICE_SMART_CONTRACT_DEFAULT_WEI),
            gas_limit_default: GAS_LIMIT_DEFAULT,
            default_sequence: DEFAULT_SEQUENCE,
        }
    }
}

impl ProtocolConfig {
    /// Parses a JSON document of overrides.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Returns `true` if `chain_id` is one of [`KNOWN_CHAIN_IDS`].
///
/// Unknown ids are still signable (private deployments exist); callers use
/// this to warn, not to refuse.
pub fn is_known_chain_id(chain_id: &str) -> bool {
    KNOWN_CHAIN_IDS.contains(&chain_id)
}
