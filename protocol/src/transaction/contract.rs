//! Smart-contract calls and deployments.
//!
//! Unlike the other variants there is no fee field: the caller pays
//! `gasLimit × gasPrice` at most. A missing recipient deploys `data` as a
//! new contract. A missing sender is allowed for read-only dry runs, in
//! which case the zero address stands in.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::ProtocolConfig;
use crate::encoding::hex::decode_hex;
use crate::encoding::RlpItem;

use super::amount::{serde_wei_opt, Amount};
use super::components::{TxInput, TxOutput};
use super::error::TransactionError;
use super::types::TxType;
use super::variant::TxVariant;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContractParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigUint>,
    /// Call data or init code as hex, `0x` prefix optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// DTOKEN sent along with the call.
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<BigUint>,
    /// DNERO sent along with the call.
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub dnero_value: Option<BigUint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Wire layout: `[from, to, gasLimit, gasPrice, data]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartContractTransaction {
    from: TxInput,
    to: TxOutput,
    gas_limit: u64,
    gas_price: BigUint,
    data: Vec<u8>,
    sequence_override: Option<u64>,
}

impl SmartContractTransaction {
    pub fn new(params: SmartContractParams, config: &ProtocolConfig) -> Result<Self, TransactionError> {
        let data = match params.data.as_deref() {
            Some(hex_str) => decode_hex(hex_str).map_err(|e| TransactionError::hex("data", e))?,
            None => Vec::new(),
        };

        let coins = Amount::new(
            params.dnero_value.unwrap_or_default(),
            params.value.unwrap_or_default(),
        );
        let sequence = params.sequence.unwrap_or(config.default_sequence);

        Ok(Self {
            from: TxInput::new(Some(params.from.unwrap_or(Address::ZERO)), coins, sequence),
            to: TxOutput::new(params.to, Amount::zero()),
            gas_limit: params.gas_limit.unwrap_or(config.gas_limit_default),
            gas_price: params
                .gas_price
                .unwrap_or_else(|| config.gas_price_smart_contract_default.clone()),
            data,
            sequence_override: params.sequence,
        })
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> &BigUint {
        &self.gas_price
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `0x`-prefixed lowercase hex of the call data.
    pub fn data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }

    pub fn to(&self) -> Option<Address> {
        self.to.address
    }

    /// Parameters with gas limit and price resolved to what was used.
    pub fn params(&self) -> SmartContractParams {
        SmartContractParams {
            from: self.from.address,
            to: self.to.address,
            gas_limit: Some(self.gas_limit),
            gas_price: Some(self.gas_price.clone()),
            data: Some(self.data_hex()),
            value: Some(self.from.coins.dtoken_wei.clone()),
            dnero_value: Some(self.from.coins.dnero_wei.clone()),
            sequence: Some(self.from.sequence),
        }
    }
}

impl TxVariant for SmartContractTransaction {
    fn tx_type(&self) -> TxType {
        TxType::SmartContract
    }

    fn primary_input(&self) -> &TxInput {
        &self.from
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        &mut self.from
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        vec![
            self.from.to_rlp(),
            self.to.to_rlp(),
            RlpItem::uint(self.gas_limit),
            RlpItem::biguint(&self.gas_price),
            RlpItem::bytes(self.data.clone()),
        ]
    }

    fn sequence_override(&self) -> Option<u64> {
        self.sequence_override
    }
}
