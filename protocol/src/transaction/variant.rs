//! The common variant contract and the tagged union over all variants.
//!
//! Each variant owns one primary signer input (the account that pays and
//! signs) plus whatever outputs and extras its wire format needs. The
//! [`TxVariant`] trait is the uniform surface the signing pipeline and the
//! wallet work against; [`Transaction`] is the closed set of variants this
//! crate can build.

use crate::address::Address;
use crate::encoding::RlpItem;

use super::components::TxInput;
use super::contract::SmartContractTransaction;
use super::reward::StakeRewardDistributionTransaction;
use super::send::SendTransaction;
use super::stake::{DepositStakeTransaction, DepositStakeV2Transaction, WithdrawStakeTransaction};
use super::types::TxType;

// ---------------------------------------------------------------------------
// TxVariant
// ---------------------------------------------------------------------------

/// Operations every transaction variant supports.
///
/// Object safe: the pipeline takes `&mut dyn TxVariant` as readily as a
/// concrete type.
pub trait TxVariant {
    /// Fixed discriminator for this variant.
    fn tx_type(&self) -> TxType;

    /// The input whose sequence, address and signature the caller controls.
    fn primary_input(&self) -> &TxInput;

    fn primary_input_mut(&mut self) -> &mut TxInput;

    /// Sub-values in wire order. The order is consensus; do not touch it.
    fn canonical_fields(&self) -> Vec<RlpItem>;

    /// The sequence the caller supplied at construction, if any. `None`
    /// means the default was applied and a wallet may replace it.
    fn sequence_override(&self) -> Option<u64>;

    /// Every input whose signature slot must be empty while hashing.
    fn signer_inputs_mut(&mut self) -> Vec<&mut TxInput> {
        vec![self.primary_input_mut()]
    }

    fn sequence(&self) -> u64 {
        self.primary_input().sequence
    }

    fn set_sequence(&mut self, sequence: u64) {
        self.primary_input_mut().sequence = sequence;
    }

    fn from_address(&self) -> Option<Address> {
        self.primary_input().address
    }

    fn set_from(&mut self, address: Address) {
        self.primary_input_mut().address = Some(address);
    }

    /// Attaches raw signature bytes to the primary input.
    fn set_signature(&mut self, signature: Vec<u8>) {
        self.primary_input_mut().signature = signature;
    }

    /// The field list as one encoded item.
    fn to_rlp(&self) -> RlpItem {
        RlpItem::list(self.canonical_fields())
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Any transaction this crate can build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Send(SendTransaction),
    DepositStake(DepositStakeTransaction),
    DepositStakeV2(DepositStakeV2Transaction),
    WithdrawStake(WithdrawStakeTransaction),
    SmartContract(SmartContractTransaction),
    StakeRewardDistribution(StakeRewardDistributionTransaction),
}

impl Transaction {
    pub fn as_variant(&self) -> &dyn TxVariant {
        match self {
            Self::Send(tx) => tx,
            Self::DepositStake(tx) => tx,
            Self::DepositStakeV2(tx) => tx,
            Self::WithdrawStake(tx) => tx,
            Self::SmartContract(tx) => tx,
            Self::StakeRewardDistribution(tx) => tx,
        }
    }

    pub fn as_variant_mut(&mut self) -> &mut dyn TxVariant {
        match self {
            Self::Send(tx) => tx,
            Self::DepositStake(tx) => tx,
            Self::DepositStakeV2(tx) => tx,
            Self::WithdrawStake(tx) => tx,
            Self::SmartContract(tx) => tx,
            Self::StakeRewardDistribution(tx) => tx,
        }
    }
}

impl TxVariant for Transaction {
    fn tx_type(&self) -> TxType {
        self.as_variant().tx_type()
    }

    fn primary_input(&self) -> &TxInput {
        self.as_variant().primary_input()
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        self.as_variant_mut().primary_input_mut()
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        self.as_variant().canonical_fields()
    }

    fn sequence_override(&self) -> Option<u64> {
        self.as_variant().sequence_override()
    }

    fn signer_inputs_mut(&mut self) -> Vec<&mut TxInput> {
        self.as_variant_mut().signer_inputs_mut()
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Transaction {
                fn from(tx: $ty) -> Self {
                    Transaction::$variant(tx)
                }
            }
        )*
    };
}

impl_from_variant! {
    Send => SendTransaction,
    DepositStake => DepositStakeTransaction,
    DepositStakeV2 => DepositStakeV2Transaction,
    WithdrawStake => WithdrawStakeTransaction,
    SmartContract => SmartContractTransaction,
    StakeRewardDistribution => StakeRewardDistributionTransaction,
}
