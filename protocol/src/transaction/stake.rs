//! Staking: deposit and withdraw stake for validator, sentry and elite edge
//! nodes.
//!
//! Version 1 deposits name the holder by address. Version 2 deposits carry
//! a holder summary instead, the blob a node prints about itself:
//!
//! ```text
//! offset   0..20    holder address
//!         20..68    BLS public key            (48 bytes)
//!         68..164   BLS proof of possession   (96 bytes)
//!        164..229   holder signature          (65 bytes)
//! ```
//!
//! Validator and sentry summaries are exactly those 229 bytes. Elite edge
//! summaries are 261 bytes; the trailing 32 are not part of the deposit.
//! Lengths are checked on the `0x`-prefixed hex form (460 and 524
//! characters) before anything is decoded.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::{ELITE_EDGE_HOLDER_SUMMARY_HEX_LEN, HOLDER_SUMMARY_HEX_LEN, ProtocolConfig};
use crate::encoding::hex::{decode_hex, strip_hex_prefix};
use crate::encoding::RlpItem;

use super::amount::{serde_wei, serde_wei_opt, Amount};
use super::components::{TxInput, TxOutput};
use super::error::TransactionError;
use super::types::{StakePurpose, TxType};
use super::variant::TxVariant;

const HOLDER_END: usize = 20;
const BLS_PUBKEY_END: usize = 68;
const BLS_POP_END: usize = 164;
const HOLDER_SIG_END: usize = 229;

/// Fee as a DTOKEN-only amount, falling back to the configured default.
fn fee_amount(gas_price: Option<&BigUint>, config: &ProtocolConfig) -> Amount {
    Amount::dtoken(
        gas_price
            .cloned()
            .unwrap_or_else(|| config.gas_price_default.clone()),
    )
}

/// Elite edge nodes stake DTOKEN through v2; everything else stakes DNERO.
fn stake_amount(purpose: StakePurpose, amount: BigUint) -> Amount {
    if purpose.stakes_dtoken() {
        Amount::dtoken(amount)
    } else {
        Amount::dnero(amount)
    }
}

// ---------------------------------------------------------------------------
// HolderSummary
// ---------------------------------------------------------------------------

/// A decoded holder summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderSummary {
    pub holder: Address,
    pub bls_pubkey: Vec<u8>,
    pub bls_pop: Vec<u8>,
    pub holder_sig: Vec<u8>,
}

impl HolderSummary {
    /// Expected `0x`-prefixed hex length for `purpose`.
    pub fn expected_hex_len(purpose: StakePurpose) -> usize {
        if purpose == StakePurpose::EliteEdge {
            ELITE_EDGE_HOLDER_SUMMARY_HEX_LEN
        } else {
            HOLDER_SUMMARY_HEX_LEN
        }
    }

    /// Whether `summary` (prefix optional) has the right length for `purpose`.
    pub fn is_valid(purpose: StakePurpose, summary: &str) -> bool {
        2 + strip_hex_prefix(summary).len() == Self::expected_hex_len(purpose)
    }

    pub fn parse(purpose: StakePurpose, summary: &str) -> Result<Self, TransactionError> {
        let expected = Self::expected_hex_len(purpose);
        let actual = 2 + strip_hex_prefix(summary).len();
        if actual != expected {
            return Err(TransactionError::HolderSummaryLength {
                purpose,
                expected,
                actual,
            });
        }

        let bytes = decode_hex(summary).map_err(|e| TransactionError::hex("holderSummary", e))?;
        Ok(Self {
            holder: Address::from_slice(&bytes[..HOLDER_END])?,
            bls_pubkey: bytes[HOLDER_END..BLS_PUBKEY_END].to_vec(),
            bls_pop: bytes[BLS_PUBKEY_END..BLS_POP_END].to_vec(),
            holder_sig: bytes[BLS_POP_END..HOLDER_SIG_END].to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// DepositStake (v1)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositStakeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Address>,
    pub holder: Address,
    #[serde(default, with = "serde_wei")]
    pub amount: BigUint,
    #[serde(default)]
    pub purpose: StakePurpose,
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigUint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Wire layout: `[fee, source, holder, purpose]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositStakeTransaction {
    fee: Amount,
    source: TxInput,
    holder: TxOutput,
    purpose: StakePurpose,
    sequence_override: Option<u64>,
}

impl DepositStakeTransaction {
    pub fn new(params: DepositStakeParams, config: &ProtocolConfig) -> Result<Self, TransactionError> {
        let sequence = params.sequence.unwrap_or(config.default_sequence);
        Ok(Self {
            fee: fee_amount(params.gas_price.as_ref(), config),
            source: TxInput::new(params.source, Amount::dnero(params.amount), sequence),
            holder: TxOutput::new(Some(params.holder), Amount::zero()),
            purpose: params.purpose,
            sequence_override: params.sequence,
        })
    }

    pub fn fee(&self) -> &Amount {
        &self.fee
    }

    pub fn source(&self) -> &TxInput {
        &self.source
    }

    pub fn holder(&self) -> &TxOutput {
        &self.holder
    }

    pub fn purpose(&self) -> StakePurpose {
        self.purpose
    }

    pub fn params(&self) -> DepositStakeParams {
        DepositStakeParams {
            source: self.source.address,
            holder: self.holder.address.unwrap_or(Address::ZERO),
            amount: self.source.coins.dnero_wei.clone(),
            purpose: self.purpose,
            gas_price: Some(self.fee.dtoken_wei.clone()),
            sequence: Some(self.source.sequence),
        }
    }
}

impl TxVariant for DepositStakeTransaction {
    fn tx_type(&self) -> TxType {
        TxType::DepositStake
    }

    fn primary_input(&self) -> &TxInput {
        &self.source
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        &mut self.source
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        vec![
            self.fee.to_rlp(),
            self.source.to_rlp(),
            self.holder.to_rlp(),
            RlpItem::uint(self.purpose.as_u64()),
        ]
    }

    fn sequence_override(&self) -> Option<u64> {
        self.sequence_override
    }
}

// ---------------------------------------------------------------------------
// DepositStakeV2
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositStakeV2Params {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Address>,
    pub holder_summary: String,
    #[serde(default, with = "serde_wei")]
    pub amount: BigUint,
    #[serde(default)]
    pub purpose: StakePurpose,
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigUint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Wire layout:
/// `[fee, source, holder, purpose, blsPubkey, blsPop, holderSig]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositStakeV2Transaction {
    fee: Amount,
    source: TxInput,
    holder: TxOutput,
    purpose: StakePurpose,
    summary: HolderSummary,
    holder_summary_hex: String,
    sequence_override: Option<u64>,
}

impl DepositStakeV2Transaction {
    pub fn new(params: DepositStakeV2Params, config: &ProtocolConfig) -> Result<Self, TransactionError> {
        let summary = HolderSummary::parse(params.purpose, &params.holder_summary)?;
        let sequence = params.sequence.unwrap_or(config.default_sequence);

        Ok(Self {
            fee: fee_amount(params.gas_price.as_ref(), config),
            source: TxInput::new(
                params.source,
                stake_amount(params.purpose, params.amount),
                sequence,
            ),
            holder: TxOutput::new(Some(summary.holder), Amount::zero()),
            purpose: params.purpose,
            holder_summary_hex: format!("0x{}", strip_hex_prefix(&params.holder_summary)),
            summary,
            sequence_override: params.sequence,
        })
    }

    pub fn fee(&self) -> &Amount {
        &self.fee
    }

    pub fn source(&self) -> &TxInput {
        &self.source
    }

    pub fn holder(&self) -> &TxOutput {
        &self.holder
    }

    pub fn purpose(&self) -> StakePurpose {
        self.purpose
    }

    pub fn holder_summary(&self) -> &HolderSummary {
        &self.summary
    }

    pub fn params(&self) -> DepositStakeV2Params {
        let staked = if self.purpose.stakes_dtoken() {
            &self.source.coins.dtoken_wei
        } else {
            &self.source.coins.dnero_wei
        };
        DepositStakeV2Params {
            source: self.source.address,
            holder_summary: self.holder_summary_hex.clone(),
            amount: staked.clone(),
            purpose: self.purpose,
            gas_price: Some(self.fee.dtoken_wei.clone()),
            sequence: Some(self.source.sequence),
        }
    }
}

impl TxVariant for DepositStakeV2Transaction {
    fn tx_type(&self) -> TxType {
        TxType::DepositStakeV2
    }

    fn primary_input(&self) -> &TxInput {
        &self.source
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        &mut self.source
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        vec![
            self.fee.to_rlp(),
            self.source.to_rlp(),
            self.holder.to_rlp(),
            RlpItem::uint(self.purpose.as_u64()),
            RlpItem::bytes(self.summary.bls_pubkey.clone()),
            RlpItem::bytes(self.summary.bls_pop.clone()),
            RlpItem::bytes(self.summary.holder_sig.clone()),
        ]
    }

    fn sequence_override(&self) -> Option<u64> {
        self.sequence_override
    }
}

// ---------------------------------------------------------------------------
// WithdrawStake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawStakeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Address>,
    pub holder: Address,
    #[serde(default)]
    pub purpose: StakePurpose,
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigUint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Wire layout: `[fee, source, holder, purpose]`. The source carries no
/// coins; the whole stake held for `holder` is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawStakeTransaction {
    fee: Amount,
    source: TxInput,
    holder: TxOutput,
    purpose: StakePurpose,
    sequence_override: Option<u64>,
}

impl WithdrawStakeTransaction {
    pub fn new(params: WithdrawStakeParams, config: &ProtocolConfig) -> Result<Self, TransactionError> {
        let sequence = params.sequence.unwrap_or(config.default_sequence);
        Ok(Self {
            fee: fee_amount(params.gas_price.as_ref(), config),
            source: TxInput::new(params.source, Amount::zero(), sequence),
            holder: TxOutput::new(Some(params.holder), Amount::zero()),
            purpose: params.purpose,
            sequence_override: params.sequence,
        })
    }

    pub fn fee(&self) -> &Amount {
        &self.fee
    }

    pub fn source(&self) -> &TxInput {
        &self.source
    }

    pub fn holder(&self) -> &TxOutput {
        &self.holder
    }

    pub fn purpose(&self) -> StakePurpose {
        self.purpose
    }

    pub fn params(&self) -> WithdrawStakeParams {
        WithdrawStakeParams {
            source: self.source.address,
            holder: self.holder.address.unwrap_or(Address::ZERO),
            purpose: self.purpose,
            gas_price: Some(self.fee.dtoken_wei.clone()),
            sequence: Some(self.source.sequence),
        }
    }
}

impl TxVariant for WithdrawStakeTransaction {
    fn tx_type(&self) -> TxType {
        TxType::WithdrawStake
    }

    fn primary_input(&self) -> &TxInput {
        &self.source
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        &mut self.source
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        vec![
            self.fee.to_rlp(),
            self.source.to_rlp(),
            self.holder.to_rlp(),
            RlpItem::uint(self.purpose.as_u64()),
        ]
    }

    fn sequence_override(&self) -> Option<u64> {
        self.sequence_override
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
