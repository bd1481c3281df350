//! The two-asset amount model.
//!
//! Every balance on the network is a pair of non-negative integers in wei:
//! DNERO (the primary asset) and DTOKEN (the secondary asset, which also
//! pays fees). Both are arbitrary precision; nothing here ever touches a
//! float.
//!
//! Amounts arrive from callers as strings more often than not, in whatever
//! shape their number library printed them: `"1000"`, `"0x3e8"`, `"1e+22"`.
//! [`parse_wei`] accepts all of those as long as the value is an exact
//! non-negative integer.

use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{pow, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::UNIT_DECIMALS;
use crate::encoding::RlpItem;

/// Largest exponent accepted in `1e+N` notation. Far above any real
/// supply, low enough that `10^N` stays cheap to compute.
const MAX_EXPONENT: u32 = 4096;

/// Wei-string parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount {0:?} is negative")]
    Negative(String),

    #[error("amount {0:?} is not a number")]
    NotANumber(String),

    #[error("amount {0:?} is not a whole number of wei")]
    Fractional(String),

    #[error("amount {0:?} has an exponent beyond 4096")]
    ExponentTooLarge(String),
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A DNERO/DTOKEN pair, both in wei. Absent halves are zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Amount {
    #[serde(with = "serde_wei")]
    pub dnero_wei: BigUint,
    #[serde(with = "serde_wei")]
    pub dtoken_wei: BigUint,
}

impl Amount {
    pub fn new(dnero_wei: BigUint, dtoken_wei: BigUint) -> Self {
        Self {
            dnero_wei,
            dtoken_wei,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// DNERO only.
    pub fn dnero(wei: BigUint) -> Self {
        Self::new(wei, BigUint::zero())
    }

    /// DTOKEN only. Fees look like this.
    pub fn dtoken(wei: BigUint) -> Self {
        Self::new(BigUint::zero(), wei)
    }

    pub fn is_zero(&self) -> bool {
        self.dnero_wei.is_zero() && self.dtoken_wei.is_zero()
    }

    /// `[dnero, dtoken]`, each a minimal big-endian integer.
    pub fn to_rlp(&self) -> RlpItem {
        RlpItem::list(vec![
            RlpItem::biguint(&self.dnero_wei),
            RlpItem::biguint(&self.dtoken_wei),
        ])
    }

    /// Inverse of [`to_rlp`](Self::to_rlp).
    pub fn from_rlp(item: &RlpItem) -> Result<Self, crate::encoding::RlpError> {
        let fields = item.as_list_of(2)?;
        Ok(Self::new(fields[0].as_biguint()?, fields[1].as_biguint()?))
    }
}

impl std::ops::Add for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount::new(
            &self.dnero_wei + &rhs.dnero_wei,
            &self.dtoken_wei + &rhs.dtoken_wei,
        )
    }
}

// ---------------------------------------------------------------------------
// Parsing & formatting
// ---------------------------------------------------------------------------

/// Parses a wei amount: decimal, `0x` hex, or exponent notation.
pub fn parse_wei(input: &str) -> Result<BigUint, AmountError> {
    let trimmed = input.trim();
    if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| AmountError::NotANumber(input.to_string()));
    }
    parse_scaled(input, 0)
}

/// Converts a decimal unit amount (`"0.0001"`) to wei.
pub fn to_wei(units: &str) -> Result<BigUint, AmountError> {
    parse_scaled(units, UNIT_DECIMALS as i64)
}

/// Renders wei as a decimal unit amount with trailing zeros trimmed.
pub fn from_wei(wei: &BigUint) -> String {
    let scale = pow(BigUint::from(10u8), UNIT_DECIMALS as usize);
    let whole = wei / &scale;
    let frac = wei % &scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let padded = format!("{:0>width$}", frac.to_string(), width = UNIT_DECIMALS as usize);
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

/// `mantissa[e exponent]` times `10^shift`, required to land on an integer.
fn parse_scaled(input: &str, shift: i64) -> Result<BigUint, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(input.to_string()));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let not_a_number = || AmountError::NotANumber(input.to_string());

    let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => {
            let exp_str = &unsigned[pos + 1..];
            let exp = i64::from_str(exp_str.strip_prefix('+').unwrap_or(exp_str))
                .map_err(|_| not_a_number())?;
            (&unsigned[..pos], exp)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(not_a_number());
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(not_a_number());
    }

    let digits = format!("{int_part}{frac_part}");
    let value = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(not_a_number)?;

    let too_large = || AmountError::ExponentTooLarge(input.to_string());
    let frac_len = i64::try_from(frac_part.len()).map_err(|_| too_large())?;
    let scale = exponent
        .checked_add(shift)
        .and_then(|s| s.checked_sub(frac_len))
        .ok_or_else(too_large)?;
    if scale.unsigned_abs() > u64::from(MAX_EXPONENT) {
        return Err(too_large());
    }
    let factor = pow(BigUint::from(10u8), scale.unsigned_abs() as usize);

    if scale >= 0 {
        Ok(value * factor)
    } else if (&value % &factor).is_zero() {
        Ok(value / factor)
    } else {
        Err(AmountError::Fractional(input.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// JSON wei fields: read from a string or an integer, written as a decimal
/// string so no JSON consumer rounds it through a double.
pub mod serde_wei {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::parse_wei;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum WeiRepr {
        Int(u64),
        Str(String),
    }

    impl WeiRepr {
        pub(super) fn into_biguint<E: de::Error>(self) -> Result<BigUint, E> {
            match self {
                WeiRepr::Int(n) => Ok(BigUint::from(n)),
                WeiRepr::Str(s) => parse_wei(&s).map_err(E::custom),
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        WeiRepr::deserialize(deserializer)?.into_biguint()
    }
}

/// [`serde_wei`] for optional fields. `null` and absence are both `None`.
pub mod serde_wei_opt {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::serde_wei::WeiRepr;

    pub fn serialize<S: Serializer>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigUint>, D::Error> {
        Option::<WeiRepr>::deserialize(deserializer)?
            .map(WeiRepr::into_biguint)
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
