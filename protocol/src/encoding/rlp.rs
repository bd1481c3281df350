//! Recursive Length Prefix encoding.
//!
//! ```text
//! single byte 0x00..=0x7f      itself
//! string, len <= 55           0x80 + len, bytes
//! string, len > 55            0xb7 + len(len), len (big-endian), bytes
//! list, payload <= 55         0xc0 + len, items
//! list, payload > 55          0xf7 + len(len), len (big-endian), items
//! ```
//!
//! Integers are minimal big-endian byte strings: no leading zero byte, and
//! zero is the empty string. The decoder enforces the same canonical form
//! the encoder produces, so `decode(encode(x)) == x` and every accepted
//! input has exactly one encoding.

use num_bigint::BigUint;
use thiserror::Error;

use crate::address::Address;

/// Nesting depth the decoder is willing to follow.
const MAX_DEPTH: usize = 16;

/// Short-form ceiling for both strings and lists.
const SHORT_LIMIT: usize = 55;

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Decoding failures. On the encode side the only way to get one of these is
/// asking an item for a shape it does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RlpError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("non-canonical encoding: {0}")]
    NonCanonical(&'static str),

    #[error("length prefix overflows usize")]
    LengthOverflow,

    #[error("nesting deeper than 16 levels")]
    TooDeep,

    #[error("{0} trailing bytes after item")]
    TrailingBytes(usize),

    #[error("expected a list, found a byte string")]
    ExpectedList,

    #[error("expected a byte string, found a list")]
    ExpectedBytes,

    #[error("integer has a leading zero byte")]
    LeadingZero,

    #[error("integer of {0} bytes does not fit in u64")]
    IntegerOverflow(usize),

    #[error("expected {expected} list items, found {actual}")]
    ListLength { expected: usize, actual: usize },

    #[error("expected a {expected}-byte string, found {actual} bytes")]
    BytesLength { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// RlpItem
// ---------------------------------------------------------------------------

/// A value in the encoding's data model: a byte string or a list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// The empty byte string, which is also how zero is written.
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        RlpItem::Bytes(bytes.into())
    }

    /// UTF-8 bytes of `s`.
    pub fn string(s: &str) -> Self {
        RlpItem::Bytes(s.as_bytes().to_vec())
    }

    pub fn list(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }

    /// Minimal big-endian form of `value`; zero is the empty string.
    pub fn uint(value: u64) -> Self {
        let be = value.to_be_bytes();
        let first = be.iter().position(|b| *b != 0).unwrap_or(be.len());
        RlpItem::Bytes(be[first..].to_vec())
    }

    /// Minimal big-endian form of an arbitrary-precision value.
    pub fn biguint(value: &BigUint) -> Self {
        if value.bits() == 0 {
            RlpItem::empty()
        } else {
            RlpItem::Bytes(value.to_bytes_be())
        }
    }

    pub fn address(address: &Address) -> Self {
        RlpItem::Bytes(address.as_bytes().to_vec())
    }

    /// Canonical encoding of this item.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut out);
        out
    }

    /// Appends the canonical encoding of this item to `out`.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            RlpItem::Bytes(bytes) => {
                if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
                    out.push(bytes[0]);
                } else {
                    encode_length(bytes.len(), STRING_OFFSET, out);
                    out.extend_from_slice(bytes);
                }
            }
            RlpItem::List(items) => {
                let payload_len = items.iter().map(RlpItem::encoded_len).sum();
                encode_length(payload_len, LIST_OFFSET, out);
                for item in items {
                    item.encode_to(out);
                }
            }
        }
    }

    /// Exact size of [`encode`](Self::encode)'s output.
    pub fn encoded_len(&self) -> usize {
        match self {
            RlpItem::Bytes(bytes) if bytes.len() == 1 && bytes[0] < STRING_OFFSET => 1,
            RlpItem::Bytes(bytes) => header_len(bytes.len()) + bytes.len(),
            RlpItem::List(items) => {
                let payload: usize = items.iter().map(RlpItem::encoded_len).sum();
                header_len(payload) + payload
            }
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], RlpError> {
        match self {
            RlpItem::Bytes(bytes) => Ok(bytes),
            RlpItem::List(_) => Err(RlpError::ExpectedBytes),
        }
    }

    pub fn as_list(&self) -> Result<&[RlpItem], RlpError> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(RlpError::ExpectedList),
        }
    }

    /// The list's items, which must number exactly `expected`.
    pub fn as_list_of(&self, expected: usize) -> Result<&[RlpItem], RlpError> {
        let items = self.as_list()?;
        if items.len() != expected {
            return Err(RlpError::ListLength {
                expected,
                actual: items.len(),
            });
        }
        Ok(items)
    }

    pub fn as_u64(&self) -> Result<u64, RlpError> {
        let bytes = self.as_bytes()?;
        if bytes.first() == Some(&0) {
            return Err(RlpError::LeadingZero);
        }
        if bytes.len() > 8 {
            return Err(RlpError::IntegerOverflow(bytes.len()));
        }
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn as_biguint(&self) -> Result<BigUint, RlpError> {
        let bytes = self.as_bytes()?;
        if bytes.first() == Some(&0) {
            return Err(RlpError::LeadingZero);
        }
        Ok(BigUint::from_bytes_be(bytes))
    }

    /// A 20-byte address. The empty string is accepted as "no address".
    pub fn as_address(&self) -> Result<Option<Address>, RlpError> {
        let bytes = self.as_bytes()?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Address::from_slice(bytes)
            .map(Some)
            .map_err(|_| RlpError::BytesLength {
                expected: crate::config::ADDRESS_LENGTH,
                actual: bytes.len(),
            })
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(bytes: Vec<u8>) -> Self {
        RlpItem::Bytes(bytes)
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Canonical encoding of `item`.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    item.encode()
}

fn header_len(len: usize) -> usize {
    if len <= SHORT_LIMIT {
        1
    } else {
        1 + minimal_be(len as u64).len()
    }
}

fn encode_length(len: usize, offset: u8, out: &mut Vec<u8>) {
    if len <= SHORT_LIMIT {
        out.push(offset + len as u8);
    } else {
        let len_bytes = minimal_be(len as u64);
        out.push(offset + SHORT_LIMIT as u8 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
}

fn minimal_be(value: u64) -> Vec<u8> {
    let be = value.to_be_bytes();
    let first = be.iter().position(|b| *b != 0).unwrap_or(be.len());
    be[first..].to_vec()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes exactly one item; trailing bytes are an error.
pub fn decode(input: &[u8]) -> Result<RlpItem, RlpError> {
    let (item, consumed) = decode_item(input, 0)?;
    if consumed != input.len() {
        return Err(RlpError::TrailingBytes(input.len() - consumed));
    }
    Ok(item)
}

/// Decodes a concatenation of items, such as `type ∥ body` on the wire.
pub fn decode_stream(mut input: &[u8]) -> Result<Vec<RlpItem>, RlpError> {
    let mut items = Vec::new();
    while !input.is_empty() {
        let (item, consumed) = decode_item(input, 0)?;
        items.push(item);
        input = &input[consumed..];
    }
    Ok(items)
}

fn decode_item(input: &[u8], depth: usize) -> Result<(RlpItem, usize), RlpError> {
    if depth > MAX_DEPTH {
        return Err(RlpError::TooDeep);
    }
    let prefix = *input.first().ok_or(RlpError::UnexpectedEof)?;

    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), 1)),
        0x80..=0xbf => {
            let (offset, len) = read_header(input, STRING_OFFSET)?;
            let body = slice(input, offset, len)?;
            if len == 1 && body[0] < STRING_OFFSET {
                return Err(RlpError::NonCanonical("single byte below 0x80 wrapped in a header"));
            }
            Ok((RlpItem::Bytes(body.to_vec()), offset + len))
        }
        0xc0..=0xff => {
            let (offset, len) = read_header(input, LIST_OFFSET)?;
            let mut body = slice(input, offset, len)?;
            let mut items = Vec::new();
            while !body.is_empty() {
                let (item, consumed) = decode_item(body, depth + 1)?;
                items.push(item);
                body = &body[consumed..];
            }
            Ok((RlpItem::List(items), offset + len))
        }
    }
}

/// Returns (header length, payload length).
fn read_header(input: &[u8], offset: u8) -> Result<(usize, usize), RlpError> {
    let prefix = input[0];
    let short = usize::from(prefix - offset);
    if short <= SHORT_LIMIT {
        return Ok((1, short));
    }

    let len_of_len = short - SHORT_LIMIT;
    let len_bytes = slice(input, 1, len_of_len)?;
    if len_bytes[0] == 0 {
        return Err(RlpError::NonCanonical("length with leading zero"));
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    if len <= SHORT_LIMIT {
        return Err(RlpError::NonCanonical("long form used for a short payload"));
    }
    Ok((1 + len_of_len, len))
}

fn slice(input: &[u8], start: usize, len: usize) -> Result<&[u8], RlpError> {
    let end = start.checked_add(len).ok_or(RlpError::LengthOverflow)?;
    input.get(start..end).ok_or(RlpError::UnexpectedEof)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
