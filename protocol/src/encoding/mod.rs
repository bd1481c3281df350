//! # Canonical Encoding
//!
//! The network speaks RLP: byte strings and nested lists, each prefixed by
//! its length. There is exactly one valid encoding per value, which is what
//! makes signatures over encoded bytes meaningful.
//!
//! - **rlp** — [`RlpItem`] trees, the encoder and a canonical decoder.
//! - **hex** — Strict hex parsing for caller-supplied strings. Odd lengths
//!   and stray characters are errors, never silently padded.

pub mod hex;
pub mod rlp;

pub use self::hex::{decode_hex, encode_hex_prefixed};
pub use rlp::{decode, decode_stream, RlpError, RlpItem};
