//! Terminal walkthrough of the Dnero signing pipeline.
//!
//! Generates a key, builds a Send and an elite edge stake deposit, shows the
//! sign bytes, signs both, and proves the signer can be recovered from the
//! broadcast bytes alone. Nothing touches the network.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use num_bigint::BigUint;

use dnero_protocol::config::{ProtocolConfig, CHAIN_ID_MAINNET, TEN_18};
use dnero_protocol::crypto::{keccak256, RecoverableSignature};
use dnero_protocol::encoding::decode_stream;
use dnero_protocol::transaction::{
    from_wei, recover_signer, sign_transaction, signable_bytes, DepositStakeV2Params,
    DepositStakeV2Transaction, OutputParams, SendParams, SendTransaction, StakePurpose, TxInput,
};
use dnero_protocol::wallet::recover_message_signer;
use dnero_protocol::{Address, PrivateKey, TxVariant, Wallet};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]======================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn abbreviated(hex: &str) -> String {
    if hex.len() <= 40 {
        return hex.to_string();
    }
    format!("{}...{} ({} bytes)", &hex[..20], &hex[hex.len() - 16..], hex.len() / 2)
}

/// Signature stored in the primary input of a broadcast transaction.
fn embedded_signature(raw: &[u8], input_is_listed: bool) -> RecoverableSignature {
    let items = decode_stream(raw).expect("raw transaction decodes");
    let fields = items[1].as_list().expect("field list");
    let input_item = if input_is_listed {
        &fields[1].as_list().expect("input list")[0]
    } else {
        &fields[1]
    };
    let input = TxInput::from_rlp(input_item).expect("input decodes");
    RecoverableSignature::from_bytes(&input.signature).expect("65-byte signature")
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let config = ProtocolConfig::default();
    let demo_start = Instant::now();

    println!("{BOLD}{WHITE}Dnero transaction signing demo{RESET}");

    // -----------------------------------------------------------------------
    // Step 1: Keys
    // -----------------------------------------------------------------------

    section(1, "secp256k1 key and address");
    let t = Instant::now();
    let wallet = Wallet::generate();
    timing("keygen", t.elapsed());
    info("Sender", &wallet.address().to_string());

    let recipient = PrivateKey::generate().address();
    info("Recipient", &recipient.to_string());

    // -----------------------------------------------------------------------
    // Step 2: Send
    // -----------------------------------------------------------------------

    section(2, "Send 2.5 DNERO");
    let mut send = SendTransaction::new(
        SendParams {
            outputs: vec![OutputParams {
                address: Some(recipient),
                dnero_wei: BigUint::from(TEN_18) * 5u32 / 2u32,
                ..Default::default()
            }],
            sequence: Some(1),
            ..Default::default()
        },
        &config,
    )
    .expect("valid send");
    send.set_from(wallet.address());

    info("Fee (DTOKEN)", &from_wei(&send.fee().dtoken_wei));
    info("Input (DNERO)", &from_wei(&send.input().coins.dnero_wei));

    let sign_bytes = signable_bytes(&mut send, CHAIN_ID_MAINNET);
    info("Sign bytes", &abbreviated(&hex::encode(&sign_bytes)));
    info("Digest", &hex::encode(keccak256(&sign_bytes)));

    let t = Instant::now();
    let raw_hex = wallet
        .sign_transaction(&mut send, CHAIN_ID_MAINNET)
        .expect("signing succeeds");
    timing("sign", t.elapsed());
    info("Raw", &abbreviated(&raw_hex));

    let raw = hex::decode(&raw_hex).expect("hex");
    let signature = embedded_signature(&raw, true);
    let signer = recover_signer(&mut send, CHAIN_ID_MAINNET, &signature).expect("recovery");
    assert_eq!(signer, wallet.address());
    success("Signer recovered from the broadcast bytes");

    // -----------------------------------------------------------------------
    // Step 3: Elite edge stake
    // -----------------------------------------------------------------------

    section(3, "Deposit 10,000 DTOKEN on an elite edge node");
    let staker = PrivateKey::generate();
    let holder = Address::from_bytes([0x5e; 20]);
    let mut summary = holder.as_bytes().to_vec();
    summary.extend((0..241u32).map(|i| (i % 251) as u8));

    let mut stake = DepositStakeV2Transaction::new(
        DepositStakeV2Params {
            source: Some(staker.address()),
            holder_summary: hex::encode(&summary),
            amount: BigUint::from(TEN_18) * 10_000u32,
            purpose: StakePurpose::EliteEdge,
            sequence: Some(2),
            ..Default::default()
        },
        &config,
    )
    .expect("valid stake");

    info("Holder", &stake.holder_summary().holder.to_string());
    info("Staked (DTOKEN)", &from_wei(&stake.source().coins.dtoken_wei));

    let signed = sign_transaction(&mut stake, CHAIN_ID_MAINNET, &staker).expect("signing succeeds");
    let signature = embedded_signature(&signed.raw, false);
    assert_eq!(
        recover_signer(&mut stake, CHAIN_ID_MAINNET, &signature).expect("recovery"),
        staker.address()
    );
    success("Stake deposit signed and verified");

    // -----------------------------------------------------------------------
    // Step 4: Personal message
    // -----------------------------------------------------------------------

    section(4, "Personal message signature");
    let message = b"I control this address";
    let signature = wallet.sign_message(message).expect("message signing");
    info("Signature", &signature.to_hex());
    assert_eq!(
        recover_message_signer(message, &signature).expect("recovery"),
        wallet.address()
    );
    success("Message signer recovered");

    println!();
    timing("total", demo_start.elapsed());
}
