//! Inputs and outputs, the building blocks every variant composes.

use crate::address::Address;
use crate::encoding::{RlpError, RlpItem};

use super::amount::Amount;

// ---------------------------------------------------------------------------
// TxInput
// ---------------------------------------------------------------------------

/// A signer: the account funds come from, its sequence, and (once signed)
/// its 65-byte recoverable signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxInput {
    pub address: Option<Address>,
    pub coins: Amount,
    pub sequence: u64,
    /// Empty until signed.
    pub signature: Vec<u8>,
}

impl TxInput {
    pub fn new(address: Option<Address>, coins: Amount, sequence: u64) -> Self {
        Self {
            address,
            coins,
            sequence,
            signature: Vec::new(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// `[address, coins, sequence, signature]`. A missing address is the
    /// empty string, not the zero address.
    pub fn to_rlp(&self) -> RlpItem {
        RlpItem::list(vec![
            self.address
                .as_ref()
                .map(RlpItem::address)
                .unwrap_or_else(RlpItem::empty),
            self.coins.to_rlp(),
            RlpItem::uint(self.sequence),
            RlpItem::bytes(self.signature.clone()),
        ])
    }

    pub fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        let fields = item.as_list_of(4)?;
        Ok(Self {
            address: fields[0].as_address()?,
            coins: Amount::from_rlp(&fields[1])?,
            sequence: fields[2].as_u64()?,
            signature: fields[3].as_bytes()?.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// TxOutput
// ---------------------------------------------------------------------------

/// A recipient and what it receives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxOutput {
    pub address: Option<Address>,
    pub coins: Amount,
}

impl TxOutput {
    pub fn new(address: Option<Address>, coins: Amount) -> Self {
        Self { address, coins }
    }

    /// `[address, coins]`. A missing address is written as the zero address.
    pub fn to_rlp(&self) -> RlpItem {
        RlpItem::list(vec![
            RlpItem::address(&self.address.unwrap_or(Address::ZERO)),
            self.coins.to_rlp(),
        ])
    }

    pub fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        let fields = item.as_list_of(2)?;
        Ok(Self {
            address: fields[0].as_address()?,
            coins: Amount::from_rlp(&fields[1])?,
        })
    }
}
