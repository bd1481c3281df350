//! Wire discriminators.
//!
//! Both enums travel as small unsigned integers: on the wire as the leading
//! encoded item, and in JSON as plain numbers. The values are fixed by the
//! network and several are reserved for transactions only validators or the
//! chain itself produce.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// TxType
// ---------------------------------------------------------------------------

/// Transaction type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TxType {
    /// Block reward. Produced by validators, never by wallets.
    Coinbase = 0,
    /// Validator slashing. Produced by the chain.
    Slash = 1,
    Send = 2,
    ReserveFund = 3,
    ReleaseFund = 4,
    ServicePayment = 5,
    SplitRule = 6,
    SmartContract = 7,
    DepositStake = 8,
    WithdrawStake = 9,
    DepositStakeV2 = 10,
    StakeRewardDistribution = 11,
}

impl TxType {
    pub const ALL: [TxType; 12] = [
        TxType::Coinbase,
        TxType::Slash,
        TxType::Send,
        TxType::ReserveFund,
        TxType::ReleaseFund,
        TxType::ServicePayment,
        TxType::SplitRule,
        TxType::SmartContract,
        TxType::DepositStake,
        TxType::WithdrawStake,
        TxType::DepositStakeV2,
        TxType::StakeRewardDistribution,
    ];

    pub fn from_u64(value: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_u64() == value)
    }

    pub fn as_u64(self) -> u64 {
        self as u8 as u64
    }

    /// Whether this crate can build and sign transactions of this type.
    pub fn is_buildable(self) -> bool {
        matches!(
            self,
            TxType::Send
                | TxType::SmartContract
                | TxType::DepositStake
                | TxType::WithdrawStake
                | TxType::DepositStakeV2
                | TxType::StakeRewardDistribution
        )
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Coinbase => "Coinbase",
            Self::Slash => "Slash",
            Self::Send => "Send",
            Self::ReserveFund => "ReserveFund",
            Self::ReleaseFund => "ReleaseFund",
            Self::ServicePayment => "ServicePayment",
            Self::SplitRule => "SplitRule",
            Self::SmartContract => "SmartContract",
            Self::DepositStake => "DepositStake",
            Self::WithdrawStake => "WithdrawStake",
            Self::DepositStakeV2 => "DepositStakeV2",
            Self::StakeRewardDistribution => "StakeRewardDistribution",
        };
        f.write_str(name)
    }
}

impl Serialize for TxType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_u64())
    }
}

impl<'de> Deserialize<'de> for TxType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u64::deserialize(deserializer)?;
        Self::from_u64(value)
            .ok_or_else(|| de::Error::custom(format!("unknown transaction type {value}")))
    }
}

// ---------------------------------------------------------------------------
// StakePurpose
// ---------------------------------------------------------------------------

/// What a stake deposit or withdrawal is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StakePurpose {
    #[default]
    Validator = 0,
    Sentry = 1,
    /// Staked in DTOKEN rather than DNERO.
    EliteEdge = 2,
}

impl StakePurpose {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Validator),
            1 => Some(Self::Sentry),
            2 => Some(Self::EliteEdge),
            _ => None,
        }
    }

    pub fn as_u64(self) -> u64 {
        self as u8 as u64
    }

    /// Elite edge nodes are staked with the secondary asset.
    pub fn stakes_dtoken(self) -> bool {
        self == StakePurpose::EliteEdge
    }
}

impl fmt::Display for StakePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validator => write!(f, "validator"),
            Self::Sentry => write!(f, "sentry"),
            Self::EliteEdge => write!(f, "elite edge"),
        }
    }
}

impl Serialize for StakePurpose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_u64())
    }
}

impl<'de> Deserialize<'de> for StakePurpose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u64::deserialize(deserializer)?;
        Self::from_u64(value)
            .ok_or_else(|| de::Error::custom(format!("unknown stake purpose {value}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
