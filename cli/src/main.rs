// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Dnero CLI
//!
//! Entry point for the `dnero-cli` binary: an offline signer over
//! `dnero-protocol`. It never opens a socket; the hex it prints is handed
//! to whatever transport the operator uses.
//!
//! - `sign`       — sign an envelope and print the raw hex
//! - `encode`     — print the unsigned raw hex
//! - `sign-bytes` — print the bytes whose digest is signed
//! - `address`    — print the key's address
//! - `version`    — print build version information

mod cli;
mod logging;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use zeroize::Zeroizing;

use dnero_protocol::config::{is_known_chain_id, KNOWN_CHAIN_IDS};
use dnero_protocol::transaction::{raw_bytes, sign_transaction, signable_bytes};
use dnero_protocol::{PrivateKey, ProtocolConfig, Transaction, TxVariant};

use cli::{Commands, DneroCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = DneroCli::parse();
    logging::init_logging("dnero_cli=info,dnero_protocol=warn", LogFormat::from(cli.log_format));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Sign(args) => {
            let mut tx = load_transaction(&args.file.tx, &config)?;
            let key = parse_key(args.key.private_key)?;
            check_chain_id(&args.chain.chain_id);

            let signed = sign_transaction(&mut tx, &args.chain.chain_id, &key)
                .context("failed to sign transaction")?;
            tracing::info!(
                tx_type = %signed.tx_type,
                signer = %key.address(),
                sequence = tx.sequence(),
                chain_id = %args.chain.chain_id,
                "signed transaction"
            );
            println!("{}", signed.raw_hex());
        }
        Commands::Encode(args) => {
            let tx = load_transaction(&args.tx, &config)?;
            println!("{}", hex::encode(raw_bytes(&tx)));
        }
        Commands::SignBytes(args) => {
            let mut tx = load_transaction(&args.file.tx, &config)?;
            check_chain_id(&args.chain.chain_id);
            println!("{}", hex::encode(signable_bytes(&mut tx, &args.chain.chain_id)));
        }
        Commands::Address(args) => {
            let key = parse_key(args.private_key)?;
            println!("{}", key.address());
        }
        Commands::Version => print_version(),
    }

    Ok(())
}

/// Defaults, or the overrides in `path`.
fn load_config(path: Option<&Path>) -> Result<ProtocolConfig> {
    let Some(path) = path else {
        return Ok(ProtocolConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config = ProtocolConfig::from_json_str(&json)
        .with_context(|| format!("invalid config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded protocol config");
    Ok(config)
}

/// Reads a `{"txType", "txData"}` envelope from `path`, or stdin for `-`.
fn load_transaction(path: &Path, config: &ProtocolConfig) -> Result<Transaction> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transaction from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transaction file: {}", path.display()))?
    };

    let tx = Transaction::from_json(&json, config)
        .with_context(|| format!("invalid transaction: {}", path.display()))?;
    tracing::debug!(tx_type = %tx.tx_type(), sequence = tx.sequence(), "loaded transaction");
    Ok(tx)
}

fn parse_key(hex: String) -> Result<PrivateKey> {
    let hex = Zeroizing::new(hex);
    PrivateKey::from_hex(hex.trim()).context("invalid private key")
}

fn check_chain_id(chain_id: &str) {
    if !is_known_chain_id(chain_id) {
        tracing::warn!(chain_id, known = ?KNOWN_CHAIN_IDS, "signing for an unknown chain id");
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("dnero-cli {}", env!("CARGO_PKG_VERSION"));
    println!("chains    {}", KNOWN_CHAIN_IDS.join(", "));
}
