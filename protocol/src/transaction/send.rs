//! Send: move DNERO and/or DTOKEN from one account to any number of
//! recipients.
//!
//! The caller lists outputs; the transaction synthesizes the single input
//! that funds them. That input carries the sum of every output plus the fee,
//! so the account is debited exactly what leaves it.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::ProtocolConfig;
use crate::encoding::RlpItem;

use super::amount::{serde_wei, serde_wei_opt, Amount};
use super::components::{TxInput, TxOutput};
use super::error::TransactionError;
use super::types::TxType;
use super::variant::TxVariant;

/// One recipient as callers describe it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputParams {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default, with = "serde_wei")]
    pub dnero_wei: BigUint,
    #[serde(default, with = "serde_wei")]
    pub dtoken_wei: BigUint,
}

/// Caller-facing description of a Send.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub outputs: Vec<OutputParams>,
    /// Fee in DTOKEN wei.
    #[serde(default, with = "serde_wei_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigUint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Wire layout: `[fee, [input], [outputs...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTransaction {
    fee: Amount,
    input: TxInput,
    outputs: Vec<TxOutput>,
    sequence_override: Option<u64>,
}

impl SendTransaction {
    pub fn new(params: SendParams, config: &ProtocolConfig) -> Result<Self, TransactionError> {
        if params.outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }

        let fee = Amount::dtoken(
            params
                .gas_price
                .unwrap_or_else(|| config.gas_price_default.clone()),
        );

        let outputs: Vec<TxOutput> = params
            .outputs
            .into_iter()
            .map(|o| TxOutput::new(o.address, Amount::new(o.dnero_wei, o.dtoken_wei)))
            .collect();

        let spent = outputs
            .iter()
            .fold(fee.clone(), |total, output| &total + &output.coins);

        let sequence = params.sequence.unwrap_or(config.default_sequence);

        Ok(Self {
            fee,
            input: TxInput::new(params.from, spent, sequence),
            outputs,
            sequence_override: params.sequence,
        })
    }

    pub fn fee(&self) -> &Amount {
        &self.fee
    }

    pub fn input(&self) -> &TxInput {
        &self.input
    }

    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    /// Parameters that rebuild this transaction as it stands now.
    pub fn params(&self) -> SendParams {
        SendParams {
            from: self.input.address,
            outputs: self
                .outputs
                .iter()
                .map(|o| OutputParams {
                    address: o.address,
                    dnero_wei: o.coins.dnero_wei.clone(),
                    dtoken_wei: o.coins.dtoken_wei.clone(),
                })
                .collect(),
            gas_price: Some(self.fee.dtoken_wei.clone()),
            sequence: Some(self.input.sequence),
        }
    }
}

impl TxVariant for SendTransaction {
    fn tx_type(&self) -> TxType {
        TxType::Send
    }

    fn primary_input(&self) -> &TxInput {
        &self.input
    }

    fn primary_input_mut(&mut self) -> &mut TxInput {
        &mut self.input
    }

    fn canonical_fields(&self) -> Vec<RlpItem> {
        vec![
            self.fee.to_rlp(),
            RlpItem::list(vec![self.input.to_rlp()]),
            RlpItem::list(self.outputs.iter().map(TxOutput::to_rlp).collect()),
        ]
    }

    fn sequence_override(&self) -> Option<u64> {
        self.sequence_override
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GAS_PRICE_DEFAULT_WEI;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn output(byte: u8, dnero: u64, dtoken: u64) -> OutputParams {
        OutputParams {
            address: Some(addr(byte)),
            dnero_wei: BigUint::from(dnero),
            dtoken_wei: BigUint::from(dtoken),
        }
    }

    #[test]
    fn input_funds_outputs_plus_fee() {
        let tx = SendTransaction::new(
            SendParams {
                from: Some(addr(1)),
                outputs: vec![output(2, 10, 100), output(3, 5, 0)],
                ..Default::default()
            },
            &ProtocolConfig::default(),
        )
        .unwrap();

        assert_eq!(tx.fee(), &Amount::dtoken(BigUint::from(GAS_PRICE_DEFAULT_WEI)));
        assert_eq!(tx.input().coins.dnero_wei, BigUint::from(15u8));
        assert_eq!(
            tx.input().coins.dtoken_wei,
            BigUint::from(GAS_PRICE_DEFAULT_WEI + 100)
        );
        assert_eq!(tx.sequence(), 1);
        assert_eq!(tx.sequence_override(), None);
    }

    #[test]
    fn explicit_fee_and_sequence_win() {
        let tx = SendTransaction::new(
            SendParams {
                from: Some(addr(1)),
                outputs: vec![output(2, 0, 1)],
                gas_price: Some(BigUint::from(7u8)),
                sequence: Some(42),
            },
            &ProtocolConfig::default(),
        )
        .unwrap();
        assert_eq!(tx.fee().dtoken_wei, BigUint::from(7u8));
        assert_eq!(tx.input().coins.dtoken_wei, BigUint::from(8u8));
        assert_eq!(tx.sequence(), 42);
        assert_eq!(tx.sequence_override(), Some(42));
    }

    #[test]
    fn empty_outputs_are_rejected() {
        let err = SendTransaction::new(SendParams::default(), &ProtocolConfig::default());
        assert!(matches!(err, Err(TransactionError::NoOutputs)));
    }

    #[test]
    fn canonical_field_order() {
        let tx = SendTransaction::new(
            SendParams {
                from: Some(addr(1)),
                outputs: vec![output(2, 0, 1), output(3, 0, 2)],
                ..Default::default()
            },
            &ProtocolConfig::default(),
        )
        .unwrap();
        let fields = tx.canonical_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], tx.fee().to_rlp());
        assert_eq!(fields[1].as_list().unwrap().len(), 1);
        assert_eq!(fields[2].as_list().unwrap().len(), 2);
    }

    #[test]
    fn set_from_and_sequence_touch_only_the_input() {
        let mut tx = SendTransaction::new(
            SendParams {
                outputs: vec![output(2, 0, 1)],
                ..Default::default()
            },
            &ProtocolConfig::default(),
        )
        .unwrap();
        let outputs_before = tx.outputs().to_vec();

        tx.set_from(addr(9));
        tx.set_sequence(5);
        assert_eq!(tx.from_address(), Some(addr(9)));
        assert_eq!(tx.sequence(), 5);
        assert_eq!(tx.outputs(), outputs_before.as_slice());
    }

    #[test]
    fn params_rebuild_the_same_transaction() {
        let config = ProtocolConfig::default();
        let tx = SendTransaction::new(
            SendParams {
                from: Some(addr(1)),
                outputs: vec![output(2, 3, 4)],
                ..Default::default()
            },
            &config,
        )
        .unwrap();
        let rebuilt = SendTransaction::new(tx.params(), &config).unwrap();
        assert_eq!(rebuilt.canonical_fields(), tx.canonical_fields());
    }

    #[test]
    fn params_from_camel_case_json() {
        let params: SendParams = serde_json::from_str(
            r#"{
                "from": "0x59c32D1F9fF59FE524aaA34B703C0aC8Fad4d4d0",
                "outputs": [{"address": "0xB91f6163E6f1A60b6d932dcD1C190BD364e0df05",
                             "dtokenWei": "100000000000000"}]
            }"#,
        )
        .unwrap();
        assert_eq!(params.outputs[0].dtoken_wei, BigUint::from(100_000_000_000_000u64));
        assert_eq!(params.outputs[0].dnero_wei, BigUint::from(0u8));
        assert_eq!(params.gas_price, None);
    }
}
