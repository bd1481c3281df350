//! Wire-type dispatch and the JSON envelope.
//!
//! Transactions are stored and exchanged as
//! `{"txType": <discriminator>, "txData": {...parameters}}`. [`from_wire`]
//! turns a discriminator plus parameters back into a [`Transaction`]; a
//! discriminator this crate cannot build comes back as
//! [`TransactionError::UnrecognizedType`] so batch callers can skip it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProtocolConfig;

use super::contract::{SmartContractParams, SmartContractTransaction};
use super::error::TransactionError;
use super::reward::{StakeRewardDistributionParams, StakeRewardDistributionTransaction};
use super::send::{SendParams, SendTransaction};
use super::stake::{
    DepositStakeParams, DepositStakeTransaction, DepositStakeV2Params, DepositStakeV2Transaction,
    WithdrawStakeParams, WithdrawStakeTransaction,
};
use super::types::TxType;
use super::variant::{Transaction, TxVariant};

/// The stored form of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEnvelope {
    pub tx_type: u64,
    pub tx_data: Value,
}

/// Builds the variant for `tx_type` from its JSON parameters.
pub fn from_wire(
    tx_type: u64,
    data: Value,
    config: &ProtocolConfig,
) -> Result<Transaction, TransactionError> {
    let kind = TxType::from_u64(tx_type)
        .filter(|t| t.is_buildable())
        .ok_or(TransactionError::UnrecognizedType(tx_type))?;

    let tx: Transaction = match kind {
        TxType::Send => {
            SendTransaction::new(serde_json::from_value::<SendParams>(data)?, config)?.into()
        }
        TxType::DepositStake => DepositStakeTransaction::new(
            serde_json::from_value::<DepositStakeParams>(data)?,
            config,
        )?
        .into(),
        TxType::DepositStakeV2 => DepositStakeV2Transaction::new(
            serde_json::from_value::<DepositStakeV2Params>(data)?,
            config,
        )?
        .into(),
        TxType::WithdrawStake => WithdrawStakeTransaction::new(
            serde_json::from_value::<WithdrawStakeParams>(data)?,
            config,
        )?
        .into(),
        TxType::SmartContract => SmartContractTransaction::new(
            serde_json::from_value::<SmartContractParams>(data)?,
            config,
        )?
        .into(),
        TxType::StakeRewardDistribution => StakeRewardDistributionTransaction::new(
            serde_json::from_value::<StakeRewardDistributionParams>(data)?,
            config,
        )?
        .into(),
        other => return Err(TransactionError::UnrecognizedType(other.as_u64())),
    };
    Ok(tx)
}

impl Transaction {
    /// Same as [`from_wire`].
    pub fn from_wire(
        tx_type: u64,
        data: Value,
        config: &ProtocolConfig,
    ) -> Result<Self, TransactionError> {
        from_wire(tx_type, data, config)
    }

    /// Parses a `{"txType", "txData"}` document.
    pub fn from_json(json: &str, config: &ProtocolConfig) -> Result<Self, TransactionError> {
        let envelope: TxEnvelope = serde_json::from_str(json)?;
        from_wire(envelope.tx_type, envelope.tx_data, config)
    }

    /// The envelope for this transaction as it stands now, including any
    /// sequence assigned after construction.
    pub fn to_envelope(&self) -> Result<TxEnvelope, TransactionError> {
        let tx_data = match self {
            Self::Send(tx) => serde_json::to_value(tx.params())?,
            Self::DepositStake(tx) => serde_json::to_value(tx.params())?,
            Self::DepositStakeV2(tx) => serde_json::to_value(tx.params())?,
            Self::WithdrawStake(tx) => serde_json::to_value(tx.params())?,
            Self::SmartContract(tx) => serde_json::to_value(tx.params())?,
            Self::StakeRewardDistribution(tx) => serde_json::to_value(tx.params())?,
        };
        Ok(TxEnvelope {
            tx_type: self.tx_type().as_u64(),
            tx_data,
        })
    }

    pub fn to_json(&self) -> Result<String, TransactionError> {
        Ok(serde_json::to_string(&self.to_envelope()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::error::ErrorKind;
    use serde_json::json;

    const FROM: &str = "0x59c32d1f9ff59fe524aaa34b703c0ac8fad4d4d0";
    const TO: &str = "0xb91f6163e6f1a60b6d932dcd1c190bd364e0df05";

    #[test]
    fn dispatches_every_buildable_type() {
        let config = ProtocolConfig::default();
        let cases = [
            (2, json!({"from": FROM, "outputs": [{"address": TO, "dtokenWei": "1"}]})),
            (7, json!({"from": FROM, "to": TO, "data": "0x"})),
            (8, json!({"source": FROM, "holder": TO, "amount": "5", "purpose": 0})),
            (9, json!({"source": FROM, "holder": TO, "purpose": 1})),
            (11, json!({"holder": FROM, "beneficiary": TO, "splitBasisPoint": 100})),
        ];
        for (tx_type, data) in cases {
            let tx = from_wire(tx_type, data, &config).unwrap();
            assert_eq!(tx.tx_type().as_u64(), tx_type);
        }
    }

    #[test]
    fn unknown_and_reserved_types_are_unrecognized() {
        let config = ProtocolConfig::default();
        for tx_type in [0, 1, 3, 4, 5, 6, 12, 255] {
            let err = from_wire(tx_type, json!({}), &config).unwrap_err();
            assert!(err.is_unrecognized_type(), "type {tx_type}");
        }
    }

    #[test]
    fn malformed_data_is_validation_error() {
        let err = from_wire(2, json!({"outputs": "nope"}), &ProtocolConfig::default()).unwrap_err();
        assert!(matches!(err, TransactionError::Json(_)));
    }

    #[test]
    fn json_roundtrip_keeps_wire_form() {
        let config = ProtocolConfig::default();
        let json = format!(
            r#"{{"txType": 2, "txData": {{"from": "{FROM}", "outputs": [{{"address": "{TO}", "dtokenWei": "100000000000000"}}]}}}}"#
        );
        let mut tx = Transaction::from_json(&json, &config).unwrap();
        tx.set_sequence(8);

        let back = Transaction::from_json(&tx.to_json().unwrap(), &config).unwrap();
        assert_eq!(back.canonical_fields(), tx.canonical_fields());
        assert_eq!(back.sequence_override(), Some(8));
    }

    #[test]
    fn contract_envelope_has_resolved_gas() {
        let config = ProtocolConfig::default();
        let tx = from_wire(7, json!({"to": TO, "data": "ABCD"}), &config).unwrap();
        let envelope = tx.to_envelope().unwrap();
        assert_eq!(envelope.tx_type, 7);
        assert_eq!(envelope.tx_data["gasLimit"], 10_000_000);
        assert_eq!(envelope.tx_data["gasPrice"], "4000000000000");
        assert_eq!(envelope.tx_data["data"], "0xabcd");
    }

    #[test]
    fn bad_stake_values_are_validation_errors() {
        let config = ProtocolConfig::default();
        let holder = "0x0000000000000000000000000000000000000002";

        let err = from_wire(
            8,
            json!({"source": FROM, "holder": holder, "amount": "1", "purpose": 7}),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::Json(_)), "{err}");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = from_wire(
            8,
            json!({"source": FROM, "holder": holder, "amount": "1.5e-9223372036854775808"}),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
