//! # Typed Structured Data
//!
//! EIP-712 digests for typed-data signatures:
//!
//! ```text
//! keccak256(0x19 ∥ 0x01 ∥ domainSeparator ∥ hashStruct(primaryType, message))
//! ```
//!
//! Types arrive in the JSON shape wallets exchange, a map from struct name to
//! its ordered `{name, type}` fields. The primary type is the one struct no
//! other struct references. Values are JSON: integers as numbers or as
//! decimal / `0x` strings, byte strings as `0x` hex.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::{BigInt, Sign};
use num_traits::One;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::hash::keccak256;
use crate::address::Address;
use crate::encoding::hex::decode_hex;

/// Name of the domain struct. Never a primary type.
pub const DOMAIN_TYPE: &str = "EIP712Domain";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypedDataError {
    #[error("unknown type {0}")]
    UnknownType(String),

    #[error("no primary type: every struct is referenced by another")]
    NoPrimaryType,

    #[error("ambiguous primary type, candidates: {0:?}")]
    AmbiguousPrimaryType(Vec<String>),

    #[error("{ty} value is missing field {field}")]
    MissingField { ty: String, field: String },

    #[error("invalid {ty} value: {reason}")]
    InvalidValue { ty: String, reason: String },
}

impl TypedDataError {
    fn invalid(ty: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            ty: ty.to_string(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Types and domain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedDataField {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

/// Struct name to ordered fields.
pub type TypedDataTypes = BTreeMap<String, Vec<TypedDataField>>;

/// The signing domain. Absent fields are left out of the domain struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number or decimal / hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
    /// 32 bytes of hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl TypedDataDomain {
    /// `hashStruct(EIP712Domain, domain)`.
    pub fn separator(&self) -> Result<[u8; 32], TypedDataError> {
        let mut fields = Vec::new();
        let mut values = Map::new();
        let mut push = |name: &str, ty: &str, value: Value| {
            fields.push(TypedDataField::new(name, ty));
            values.insert(name.to_string(), value);
        };
        if let Some(name) = &self.name {
            push("name", "string", Value::String(name.clone()));
        }
        if let Some(version) = &self.version {
            push("version", "string", Value::String(version.clone()));
        }
        if let Some(chain_id) = &self.chain_id {
            push("chainId", "uint256", chain_id.clone());
        }
        if let Some(contract) = &self.verifying_contract {
            push("verifyingContract", "address", Value::String(contract.to_string()));
        }
        if let Some(salt) = &self.salt {
            push("salt", "bytes32", Value::String(salt.clone()));
        }

        let mut types = TypedDataTypes::new();
        types.insert(DOMAIN_TYPE.to_string(), fields);
        hash_struct(&types, DOMAIN_TYPE, &Value::Object(values))
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// The digest a typed-data signature signs.
pub fn hash_typed_data(
    domain: &TypedDataDomain,
    types: &TypedDataTypes,
    message: &Value,
) -> Result<[u8; 32], TypedDataError> {
    let primary = primary_type(types)?;
    let mut preimage = Vec::with_capacity(66);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(&domain.separator()?);
    preimage.extend_from_slice(&hash_struct(types, primary, message)?);
    Ok(keccak256(&preimage))
}

/// The one struct that no other struct references.
pub fn primary_type(types: &TypedDataTypes) -> Result<&str, TypedDataError> {
    let mut referenced = BTreeSet::new();
    for (owner, fields) in types {
        for field in fields {
            let base = base_type(&field.ty);
            if base != owner.as_str() && types.contains_key(base) {
                referenced.insert(base);
            }
        }
    }

    let candidates: Vec<&str> = types
        .keys()
        .map(String::as_str)
        .filter(|name| *name != DOMAIN_TYPE && !referenced.contains(name))
        .collect();
    match candidates.as_slice() {
        [] => Err(TypedDataError::NoPrimaryType),
        [primary] => Ok(*primary),
        _ => Err(TypedDataError::AmbiguousPrimaryType(
            candidates.iter().map(|c| c.to_string()).collect(),
        )),
    }
}

/// `Name(type field,...)` followed by every struct it depends on, sorted by name.
pub fn encode_type(types: &TypedDataTypes, name: &str) -> Result<String, TypedDataError> {
    let mut deps = BTreeSet::new();
    collect_dependencies(types, name, &mut deps)?;
    deps.remove(name);

    let mut out = String::new();
    for ty in std::iter::once(name).chain(deps.iter().map(String::as_str)) {
        let fields = struct_fields(types, ty)?;
        let members: Vec<String> = fields.iter().map(|f| format!("{} {}", f.ty, f.name)).collect();
        out.push_str(ty);
        out.push('(');
        out.push_str(&members.join(","));
        out.push(')');
    }
    Ok(out)
}

pub fn type_hash(types: &TypedDataTypes, name: &str) -> Result<[u8; 32], TypedDataError> {
    Ok(keccak256(encode_type(types, name)?.as_bytes()))
}

/// `keccak256(typeHash ∥ encodeData(value))`.
pub fn hash_struct(
    types: &TypedDataTypes,
    name: &str,
    value: &Value,
) -> Result<[u8; 32], TypedDataError> {
    let object = value
        .as_object()
        .ok_or_else(|| TypedDataError::invalid(name, "expected an object"))?;
    let fields = struct_fields(types, name)?;

    let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
    encoded.extend_from_slice(&type_hash(types, name)?);
    for field in fields {
        let member = object.get(&field.name).ok_or_else(|| TypedDataError::MissingField {
            ty: name.to_string(),
            field: field.name.clone(),
        })?;
        encoded.extend_from_slice(&encode_value(types, &field.ty, member)?);
    }
    Ok(keccak256(&encoded))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn struct_fields<'a>(
    types: &'a TypedDataTypes,
    name: &str,
) -> Result<&'a [TypedDataField], TypedDataError> {
    types
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| TypedDataError::UnknownType(name.to_string()))
}

fn collect_dependencies(
    types: &TypedDataTypes,
    name: &str,
    found: &mut BTreeSet<String>,
) -> Result<(), TypedDataError> {
    if found.contains(name) {
        return Ok(());
    }
    let fields = struct_fields(types, name)?;
    found.insert(name.to_string());
    for field in fields {
        let base = base_type(&field.ty);
        if types.contains_key(base) {
            collect_dependencies(types, base, found)?;
        }
    }
    Ok(())
}

/// `Person[][3]` -> `Person`.
fn base_type(ty: &str) -> &str {
    ty.split('[').next().unwrap_or(ty)
}

/// `Person[3]` -> (`Person`, `"3"`); `Person[]` -> (`Person`, `""`).
fn split_array(ty: &str) -> Option<(&str, &str)> {
    let open = ty.strip_suffix(']')?.rfind('[')?;
    Some((&ty[..open], &ty[open + 1..ty.len() - 1]))
}

fn encode_value(types: &TypedDataTypes, ty: &str, value: &Value) -> Result<[u8; 32], TypedDataError> {
    if let Some((inner, len)) = split_array(ty) {
        let items = value
            .as_array()
            .ok_or_else(|| TypedDataError::invalid(ty, "expected an array"))?;
        if !len.is_empty() {
            let expected: usize = len
                .parse()
                .map_err(|_| TypedDataError::UnknownType(ty.to_string()))?;
            if items.len() != expected {
                return Err(TypedDataError::invalid(
                    ty,
                    format!("expected {expected} items, got {}", items.len()),
                ));
            }
        }
        let mut joined = Vec::with_capacity(32 * items.len());
        for item in items {
            joined.extend_from_slice(&encode_value(types, inner, item)?);
        }
        return Ok(keccak256(&joined));
    }

    if types.contains_key(ty) {
        return hash_struct(types, ty, value);
    }
    encode_atomic(ty, value)
}

fn encode_atomic(ty: &str, value: &Value) -> Result<[u8; 32], TypedDataError> {
    let mut word = [0u8; 32];
    match ty {
        "string" => {
            let s = value
                .as_str()
                .ok_or_else(|| TypedDataError::invalid(ty, "expected a string"))?;
            return Ok(keccak256(s.as_bytes()));
        }
        "bytes" => return Ok(keccak256(&hex_value(ty, value)?)),
        "bool" => {
            let b = value
                .as_bool()
                .ok_or_else(|| TypedDataError::invalid(ty, "expected a boolean"))?;
            word[31] = u8::from(b);
        }
        "address" => {
            let address: Address = value
                .as_str()
                .ok_or_else(|| TypedDataError::invalid(ty, "expected a hex string"))?
                .parse()
                .map_err(|e: crate::address::AddressError| TypedDataError::invalid(ty, e.to_string()))?;
            word[12..].copy_from_slice(address.as_bytes());
        }
        _ => {
            if let Some(size) = ty.strip_prefix("bytes") {
                let size = match size.parse::<usize>() {
                    Ok(n) if (1..=32).contains(&n) => n,
                    _ => return Err(TypedDataError::UnknownType(ty.to_string())),
                };
                let bytes = hex_value(ty, value)?;
                if bytes.len() != size {
                    return Err(TypedDataError::invalid(
                        ty,
                        format!("expected {size} bytes, got {}", bytes.len()),
                    ));
                }
                word[..size].copy_from_slice(&bytes);
            } else if let Some(bits) = ty.strip_prefix("uint") {
                let bits = int_width(ty, bits)?;
                let n = integer_value(ty, value)?;
                if n.sign() == Sign::Minus || n.bits() > bits as u64 {
                    return Err(TypedDataError::invalid(ty, "out of range"));
                }
                write_right_aligned(&mut word, &n.magnitude().to_bytes_be());
            } else if let Some(bits) = ty.strip_prefix("int") {
                let bits = int_width(ty, bits)?;
                let n = integer_value(ty, value)?;
                let bound = BigInt::one() << (bits - 1);
                if n >= bound || n < -&bound {
                    return Err(TypedDataError::invalid(ty, "out of range"));
                }
                let twos = if n.sign() == Sign::Minus {
                    (BigInt::one() << 256usize) + n
                } else {
                    n
                };
                write_right_aligned(&mut word, &twos.magnitude().to_bytes_be());
            } else {
                return Err(TypedDataError::UnknownType(ty.to_string()));
            }
        }
    }
    Ok(word)
}

/// Bit width of `uintN` / `intN`. A bare `uint` is 256 bits.
fn int_width(ty: &str, suffix: &str) -> Result<usize, TypedDataError> {
    if suffix.is_empty() {
        return Ok(256);
    }
    match suffix.parse::<usize>() {
        Ok(bits) if bits % 8 == 0 && (8..=256).contains(&bits) => Ok(bits),
        _ => Err(TypedDataError::UnknownType(ty.to_string())),
    }
}

fn integer_value(ty: &str, value: &Value) -> Result<BigInt, TypedDataError> {
    let not_an_integer = || TypedDataError::invalid(ty, format!("not an integer: {value}"));
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(BigInt::from)
            .or_else(|| n.as_u64().map(BigInt::from))
            .ok_or_else(not_an_integer),
        Value::String(s) => {
            let s = s.trim();
            let (negative, digits) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s),
            };
            let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
                Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16),
                None => BigInt::parse_bytes(digits.as_bytes(), 10),
            }
            .ok_or_else(not_an_integer)?;
            Ok(if negative { -magnitude } else { magnitude })
        }
        _ => Err(not_an_integer()),
    }
}

fn hex_value(ty: &str, value: &Value) -> Result<Vec<u8>, TypedDataError> {
    let s = value
        .as_str()
        .ok_or_else(|| TypedDataError::invalid(ty, "expected a hex string"))?;
    decode_hex(s).map_err(|e| TypedDataError::invalid(ty, e.to_string()))
}

fn write_right_aligned(word: &mut [u8; 32], bytes: &[u8]) {
    word[32 - bytes.len()..].copy_from_slice(bytes);
}
