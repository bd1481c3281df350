//! Stake reward distribution: a node holder names a beneficiary and the
//! share of rewards, in basis points, that goes to it.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::ProtocolConfig;
use crate::encoding::RlpItem;

use super::amount::{serde_wei_opt, Amount};
use super::components::{TxInput, TxOutput};
use super::error::TransactionError;
use super::types::TxType;
use super::variant::TxVariant;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeRewardDistributionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Address>,
    /// 100 = 1%.
    #[serde(default)]
    pub split_basis_point: u64,
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigUint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Wire layout: `[fee, holder, beneficiary, splitBasisPoint]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRewardDistributionTransaction {
    fee: Amount,
    holder: TxInput,
    beneficiary: TxOutput,
    split_basis_point: u64,
    sequence_override: Option<u64>,
}

impl StakeRewardDistributionTransaction {
    pub fn new(
        params: StakeRewardDistributionParams,
        config: &ProtocolConfig,
    ) -> Result<Self, TransactionError> {
        let fee = Amount::dtoken(
            params
                .gas_price
                .unwrap_or_else(|| config.gas_price_default.clone()),
        );
        let sequence = params.sequence.unwrap_or(config.default_sequence);

        Ok(Self {
            fee,
            holder: TxInput::new(params.holder, Amount::zero(), sequence),
            beneficiary: TxOutput::new(params.beneficiary, Amount::zero()),
            split_basis_point: params.split_basis_point,
            sequence_override: params.sequence,
        })
    }

    pub fn fee(&self) -> &Amount {
        &self.fee
    }

    pub fn beneficiary(&self) -> Option<Address> {
        self.beneficiary.address
    }

    pub fn split_basis_point(&self) -> u64 {
        self.split_basis_point
    }

    pub fn params(&self) -> StakeRewardDistributionParams {
        StakeRewardDistributionParams {
            holder: self.holder.address,
            beneficiary: self.beneficiary.address,
            split_basis_point: self.split_basis_point,
            gas_price: Some(self.fee.dtoken_wei.clone()),
            sequence: Some(self.holder.sequence),
        }
    }
}

impl TxVariant for StakeRewardDistributionTransaction {
    fn tx_type(&self) -> TxType {
        TxType::StakeRewardDistribution
    }

    fn primary_input(&self) -> &TxInput {
        &self.holder
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        &mut self.holder
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        vec![
            self.fee.to_rlp(),
            self.holder.to_rlp(),
            self.beneficiary.to_rlp(),
            RlpItem::uint(self.split_basis_point),
        ]
    }

    fn sequence_override(&self) -> Option<u64> {
        self.sequence_override
    }
}
