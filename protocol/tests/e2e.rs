//! End-to-end tests for the Dnero transaction core.
//!
//! These go through the public API only: build a transaction from parameters
//! or its JSON envelope, sign it, decode the raw bytes back with the RLP
//! decoder and check what a node would see. The wallet tests run against an
//! in-memory provider so the send path is covered without a network.

use std::sync::Arc;

use async_trait::async_trait;
use num_bigint::BigUint;
use parking_lot::Mutex;

use dnero_protocol::config::{
    ProtocolConfig, CHAIN_ID_MAINNET, CHAIN_ID_PRIVATENET, CHAIN_ID_TESTNET, TEN_18,
};
use dnero_protocol::crypto::RecoverableSignature;
use dnero_protocol::encoding::{decode, decode_stream, RlpItem};
use dnero_protocol::network::rpc::{AccountResult, BroadcastResult, CallSmartContractResult};
use dnero_protocol::network::{Provider, ProviderError};
use dnero_protocol::transaction::{
    from_wire, recover_signer, sign_transaction, signable_bytes, Amount, DepositStakeV2Params,
    DepositStakeV2Transaction, OutputParams, SendParams, SendTransaction, StakePurpose, TxInput,
    TxOutput,
};
use dnero_protocol::{Address, PrivateKey, Transaction, TxType, TxVariant, Wallet};

const FROM: &str = "0x59c32D1F9fF59FE524aaA34B703C0aC8Fad4d4d0";
const TO: &str = "0xB91f6163E6f1A60b6d932dcD1C190BD364e0df05";
const EDGE_SOURCE: &str = "0x95944D0F9C86794284ABc375616C83B0E6A1A8B7";

/// 460-character sentry holder summary.
const SENTRY_SUMMARY: &str = "0x51bB30dDC5C2b42ca042Bf58b283fcA4B0a59307a746f3fe492607c743c52a1fb729cb432e6b3971fb51fb08ea66c5c3042bab805d98a06c4c503a8621c937c292d8d2ac8c0b6eef8ec400936bbce9895656f30220218d00e70fa05981a2335779415bdcbf36d46702cd0ee794ff251ab0ad8713058507380a935bece580ff0d8521d15ed888e934fbaabe346f320bc9817f455107bc5c47fbf8147b5fea266624cb0c24da5563b790fbe94fa377d6a8eec532e45f6f25e9f5aebe299476f5268bb7c1336dfb46861b1b0dd4e33267db5a27c70100086038c6be37c58db09f02361a04bd01";

/// 524-character elite edge holder summary.
const ELITE_EDGE_SUMMARY: &str = "0xE8a650b6e34650F4bE29EB5dC97a60263085Cea1967fe5db763d7017c552e0417cc85f590cbf13a9b773b280cc380be8573ca85bcc2927a40a4d9309fb3deb033e1b46de907db461ec28deb55eb5c5ac3956060dda7cedf672aae33507752a8817fe3e88071622f7ff337f605c9d362c1c0b28fd10b8613d3d3bb10c3ffb1d87506df7b85a29e19f5f686db620b283ed3372d46108cb6d20ce3a6d6717480839f6ff76d847f20487d6da9a1af994be02b4e2ddcac86311941faaec73bd4a6206fd154f6f751e7c114c12b74d17c7c202140d9db54a2171c27968295080de97d1a6d5000501b5a662240c576a7fb0c7dd2c3692b8f039e41484c8c49cda74d957bed39bc374";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn send_example() -> SendTransaction {
    SendTransaction::new(
        SendParams {
            from: Some(addr(FROM)),
            outputs: vec![OutputParams {
                address: Some(addr(TO)),
                dtoken_wei: BigUint::from(100_000_000_000_000u64),
                ..Default::default()
            }],
            ..Default::default()
        },
        &ProtocolConfig::default(),
    )
    .unwrap()
}

fn addr(hex: &str) -> Address {
    hex.parse().unwrap()
}

/// Splits raw bytes into the type discriminator and the field list.
fn split_raw(raw: &[u8]) -> (u64, Vec<RlpItem>) {
    let items = decode_stream(raw).unwrap();
    assert_eq!(items.len(), 2, "raw transaction is type followed by fields");
    let tx_type = items[0].as_u64().unwrap();
    let fields = items[1].as_list().unwrap().to_vec();
    (tx_type, fields)
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

#[test]
fn send_raw_bytes_decode_to_expected_fields() {
    let key = PrivateKey::generate();
    let mut tx = send_example();
    let signed = sign_transaction(&mut tx, CHAIN_ID_MAINNET, &key).unwrap();

    assert_eq!(signed.raw[0], 0x02);
    assert_eq!(signed.raw_hex(), signed.raw_hex().to_lowercase());
    assert!(!signed.raw_hex().starts_with("0x"));

    let (tx_type, fields) = split_raw(&signed.raw);
    assert_eq!(tx_type, TxType::Send.as_u64());
    assert_eq!(fields.len(), 3);

    let fee = Amount::from_rlp(&fields[0]).unwrap();
    assert_eq!(fee, Amount::dtoken(BigUint::from(300_000_000_000_000_000u64)));

    let inputs = fields[1].as_list().unwrap();
    assert_eq!(inputs.len(), 1);
    let input = TxInput::from_rlp(&inputs[0]).unwrap();
    assert_eq!(input.address, Some(addr(FROM)));
    assert_eq!(input.sequence, 1);
    assert_eq!(input.coins.dnero_wei, BigUint::default());
    assert_eq!(
        input.coins.dtoken_wei,
        BigUint::from(300_000_000_000_000_000u64 + 100_000_000_000_000u64)
    );
    assert_eq!(input.signature, signed.signature.to_bytes().to_vec());

    let outputs = fields[2].as_list().unwrap();
    let output = TxOutput::from_rlp(&outputs[0]).unwrap();
    assert_eq!(output.address, Some(addr(TO)));
    assert_eq!(output.coins, Amount::dtoken(BigUint::from(100_000_000_000_000u64)));
}

#[test]
fn signer_is_recoverable_and_bound_to_chain() {
    let key = PrivateKey::generate();
    let mut tx = send_example();
    let signed = sign_transaction(&mut tx, CHAIN_ID_TESTNET, &key).unwrap();

    assert_eq!(
        recover_signer(&mut tx, CHAIN_ID_TESTNET, &signed.signature).unwrap(),
        key.address()
    );
    assert_ne!(
        recover_signer(&mut tx, CHAIN_ID_MAINNET, &signed.signature).unwrap(),
        key.address()
    );
}

#[test]
fn signing_leaves_transaction_untouched() {
    let key = PrivateKey::generate();
    let mut tx = send_example();
    let before = tx.clone();
    let sign_bytes = signable_bytes(&mut tx, CHAIN_ID_MAINNET);

    sign_transaction(&mut tx, CHAIN_ID_MAINNET, &key).unwrap();
    assert_eq!(tx, before);
    assert!(!tx.input().is_signed());
    assert_eq!(signable_bytes(&mut tx, CHAIN_ID_MAINNET), sign_bytes);
}

#[test]
fn sign_bytes_envelope_shape() {
    let mut tx = send_example();
    let bytes = signable_bytes(&mut tx, CHAIN_ID_PRIVATENET);

    let envelope = decode(&bytes).unwrap();
    let items = envelope.as_list_of(6).unwrap();
    for index in [0, 1, 2, 4] {
        assert!(items[index].as_bytes().unwrap().is_empty());
    }
    assert_eq!(items[3].as_bytes().unwrap(), &[0u8; 20]);

    let payload = decode_stream(items[5].as_bytes().unwrap()).unwrap();
    assert_eq!(payload.len(), 3);
    assert_eq!(payload[0].as_bytes().unwrap(), CHAIN_ID_PRIVATENET.as_bytes());
    assert_eq!(payload[1].as_u64().unwrap(), 2);
    let fields = payload[2].as_list().unwrap();
    let input = TxInput::from_rlp(&fields[1].as_list().unwrap()[0]).unwrap();
    assert!(input.signature.is_empty());
}

// ---------------------------------------------------------------------------
// Staking
// ---------------------------------------------------------------------------

#[test]
fn elite_edge_deposit_stakes_dtoken() {
    let mut tx = DepositStakeV2Transaction::new(
        DepositStakeV2Params {
            source: Some(addr(EDGE_SOURCE)),
            holder_summary: ELITE_EDGE_SUMMARY.to_string(),
            amount: BigUint::from(TEN_18) * 10_000u32,
            purpose: StakePurpose::EliteEdge,
            ..Default::default()
        },
        &ProtocolConfig::default(),
    )
    .unwrap();

    let signed = sign_transaction(&mut tx, CHAIN_ID_MAINNET, &PrivateKey::generate()).unwrap();
    let (tx_type, fields) = split_raw(&signed.raw);
    assert_eq!(tx_type, 10);
    assert_eq!(fields.len(), 7);

    let source = TxInput::from_rlp(&fields[1]).unwrap();
    assert_eq!(source.address, Some(addr(EDGE_SOURCE)));
    assert_eq!(source.coins.dnero_wei, BigUint::default());
    assert_eq!(source.coins.dtoken_wei, BigUint::from(TEN_18) * 10_000u32);

    let holder = TxOutput::from_rlp(&fields[2]).unwrap();
    assert_eq!(
        holder.address,
        Some(addr("0xE8a650b6e34650F4bE29EB5dC97a60263085Cea1"))
    );
    assert_eq!(fields[3].as_u64().unwrap(), 2);
    assert_eq!(fields[4].as_bytes().unwrap().len(), 48);
    assert_eq!(fields[5].as_bytes().unwrap().len(), 96);
    assert_eq!(fields[6].as_bytes().unwrap().len(), 65);

    // The trailing 32 bytes of an elite edge summary are not transmitted.
    let summary = hex::decode(&ELITE_EDGE_SUMMARY[2..]).unwrap();
    assert_eq!(fields[6].as_bytes().unwrap(), &summary[164..229]);
}

#[test]
fn sentry_deposit_stakes_dnero_and_rejects_elite_length() {
    let config = ProtocolConfig::default();
    let params = |summary: &str| DepositStakeV2Params {
        source: Some(addr(FROM)),
        holder_summary: summary.to_string(),
        amount: BigUint::from(TEN_18) * 10_000u32,
        purpose: StakePurpose::Sentry,
        ..Default::default()
    };

    let tx = DepositStakeV2Transaction::new(params(SENTRY_SUMMARY), &config).unwrap();
    assert_eq!(tx.source().coins, Amount::dnero(BigUint::from(TEN_18) * 10_000u32));
    assert_eq!(
        tx.holder_summary().holder,
        addr("0x51bB30dDC5C2b42ca042Bf58b283fcA4B0a59307")
    );

    let err = DepositStakeV2Transaction::new(params(ELITE_EDGE_SUMMARY), &config).unwrap_err();
    assert!(err.to_string().contains("must be 460"));

    // Prefix is optional.
    assert!(DepositStakeV2Transaction::new(params(&SENTRY_SUMMARY[2..]), &config).is_ok());
}

// ---------------------------------------------------------------------------
// Envelope dispatch
// ---------------------------------------------------------------------------

#[test]
fn batch_skips_unrecognized_types() {
    let config = ProtocolConfig::default();
    let batch = [
        format!(r#"{{"txType": 2, "txData": {{"outputs": [{{"address": "{TO}", "dneroWei": 5}}]}}}}"#),
        r#"{"txType": 3, "txData": {}}"#.to_string(),
        format!(r#"{{"txType": 7, "txData": {{"to": "{TO}", "data": "0x60806040"}}}}"#),
        r#"{"txType": 99, "txData": {}}"#.to_string(),
    ];

    let key = PrivateKey::generate();
    let mut signed = Vec::new();
    for json in &batch {
        match Transaction::from_json(json, &config) {
            Ok(mut tx) => signed.push(sign_transaction(&mut tx, CHAIN_ID_MAINNET, &key).unwrap()),
            Err(err) if err.is_unrecognized_type() => continue,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    let types: Vec<TxType> = signed.iter().map(|s| s.tx_type).collect();
    assert_eq!(types, vec![TxType::Send, TxType::SmartContract]);
}

#[test]
fn every_buildable_type_signs_and_recovers() {
    let config = ProtocolConfig::default();
    let key = PrivateKey::generate();
    let cases = [
        (2, serde_json::json!({"outputs": [{"address": TO, "dtokenWei": "1"}]})),
        (7, serde_json::json!({"to": TO, "data": "abcd", "value": "10"})),
        (8, serde_json::json!({"holder": TO, "amount": "1000", "purpose": 0})),
        (
            10,
            serde_json::json!({"holderSummary": SENTRY_SUMMARY, "amount": "1", "purpose": 1}),
        ),
        (9, serde_json::json!({"holder": TO, "purpose": 0})),
        (11, serde_json::json!({"holder": TO, "beneficiary": FROM, "splitBasisPoint": 250})),
    ];

    for (tx_type, data) in cases {
        let mut tx = from_wire(tx_type, data, &config).unwrap();
        tx.set_from(key.address());
        let signed = sign_transaction(&mut tx, CHAIN_ID_TESTNET, &key).unwrap();
        assert_eq!(split_raw(&signed.raw).0, tx_type);
        assert_eq!(
            recover_signer(&mut tx, CHAIN_ID_TESTNET, &signed.signature).unwrap(),
            key.address(),
            "type {tx_type}"
        );
    }
}

// ---------------------------------------------------------------------------
// Wallet against an in-memory node
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryNode {
    sequences: Mutex<Vec<(Address, u64)>>,
    mempool: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl Provider for MemoryNode {
    fn chain_id(&self) -> &str {
        CHAIN_ID_PRIVATENET
    }

    async fn get_account(&self, address: &Address) -> Result<AccountResult, ProviderError> {
        let sequences = self.sequences.lock();
        let sequence = sequences
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, s)| *s)
            .ok_or_else(|| ProviderError::Transport("unknown account".into()))?;
        Ok(AccountResult {
            sequence,
            ..Default::default()
        })
    }

    async fn broadcast_raw_transaction(&self, tx_hex: &str) -> Result<BroadcastResult, ProviderError> {
        let raw = hex::decode(tx_hex).map_err(|e| ProviderError::Transport(e.to_string()))?;
        let (_, fields) = split_raw(&raw);
        let input = TxInput::from_rlp(&fields[1].as_list().unwrap()[0]).unwrap();
        let sender = input.address.unwrap();

        let mut sequences = self.sequences.lock();
        match sequences.iter_mut().find(|(a, _)| *a == sender) {
            Some(entry) => entry.1 = input.sequence,
            None => sequences.push((sender, input.sequence)),
        }
        drop(sequences);

        self.mempool.lock().push(raw);
        Ok(BroadcastResult {
            hash: format!("0x{}", hex::encode(dnero_protocol::crypto::keccak256(tx_hex.as_bytes()))),
            block: None,
        })
    }

    async fn call_smart_contract(&self, _sctx_hex: &str) -> Result<CallSmartContractResult, ProviderError> {
        Ok(CallSmartContractResult::default())
    }
}

#[tokio::test]
async fn wallet_sequences_advance_across_sends() {
    let node = Arc::new(MemoryNode::default());
    let wallet = Wallet::new(PrivateKey::generate()).connect(node.clone());

    for expected in 1..=3 {
        let mut tx = send_example();
        wallet.send_transaction(&mut tx).await.unwrap();
        assert_eq!(tx.sequence(), expected);
        assert_eq!(tx.from_address(), Some(wallet.address()));
    }
    assert_eq!(node.mempool.lock().len(), 3);

    let last = node.mempool.lock().last().cloned().unwrap();
    let (_, fields) = split_raw(&last);
    let input = TxInput::from_rlp(&fields[1].as_list().unwrap()[0]).unwrap();
    let signature = RecoverableSignature::from_bytes(&input.signature).unwrap();

    let mut tx = send_example();
    tx.set_from(wallet.address());
    tx.set_sequence(3);
    assert_eq!(
        recover_signer(&mut tx, CHAIN_ID_PRIVATENET, &signature).unwrap(),
        wallet.address()
    );
}
