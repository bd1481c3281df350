//! Strict hex helpers.
//!
//! Callers hand us addresses, payloads and holder summaries as hex strings,
//! with or without a `0x` prefix and in any letter case. Everything that
//! leaves this crate is lowercase.

use hex::FromHexError;

/// Strips a leading `0x` / `0X` if present.
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decodes a hex string, tolerating an optional `0x` prefix.
///
/// `"0x"` and `""` decode to an empty vector. Odd-length input is rejected
/// rather than left-padded.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, FromHexError> {
    hex::decode(strip_hex_prefix(input))
}

/// Lowercase hex with a `0x` prefix.
pub fn encode_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
