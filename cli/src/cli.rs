//! # CLI Interface
//!
//! Defines the command-line argument structure for `dnero-cli` using
//! `clap` derive. Every subcommand works offline: it reads a transaction
//! envelope from disk and prints hex to stdout.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dnero_protocol::config::CHAIN_ID_MAINNET;

/// Offline signer for Dnero transactions.
///
/// Transactions are JSON envelopes of the form
/// `{"txType": <n>, "txData": {...}}`.
#[derive(Parser, Debug)]
#[command(
    name = "dnero-cli",
    about = "Offline signer for Dnero transactions",
    version,
    propagate_version = true
)]
pub struct DneroCli {
    /// JSON file with protocol overrides (default fee, gas price, gas limit,
    /// default sequence).
    #[arg(long, short = 'c', global = true, env = "DNERO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format. Logs go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign a transaction and print the raw hex to broadcast.
    Sign(SignArgs),
    /// Print the unsigned raw hex, as used for smart-contract dry runs.
    Encode(TxFileArgs),
    /// Print the hex of the bytes whose digest gets signed.
    SignBytes(SignBytesArgs),
    /// Print the address of the private key.
    Address(KeyArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct TxFileArgs {
    /// Path to the transaction envelope. Use `-` for stdin.
    #[arg(long, short = 't')]
    pub tx: PathBuf,
}

#[derive(Args, Debug)]
pub struct ChainArgs {
    /// Chain the signature is bound to.
    #[arg(long, env = "DNERO_CHAIN_ID", default_value = CHAIN_ID_MAINNET)]
    pub chain_id: String,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex-encoded secp256k1 private key, `0x` prefix optional.
    ///
    /// Prefer the environment variable; command lines end up in shell history.
    #[arg(long, env = "DNERO_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub file: TxFileArgs,

    #[command(flatten)]
    pub chain: ChainArgs,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Args, Debug)]
pub struct SignBytesArgs {
    #[command(flatten)]
    pub file: TxFileArgs,

    #[command(flatten)]
    pub chain: ChainArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}
