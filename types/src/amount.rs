//! Token amount type shared by SUPER, ALIVE and DEAD balances.
//!
//! Amounts are unsigned 256-bit integers counted in the smallest unit
//! (`10^-DECIMALS` of a whole token). All arithmetic is checked; nothing in
//! the protocol wraps.

use crate::error::TypeError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw token amount (unsigned 256-bit).
///
/// Serialized as a decimal string so config files and JSON stay readable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256::zero());

    pub const MAX: Self = Self(U256::MAX);

    /// Largest pair count whose doubling still fits in 256 bits.
    pub const MAX_PAIRS: Self = Self(U256([u64::MAX, u64::MAX, u64::MAX, u64::MAX >> 1]));

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `whole * 10^DECIMALS`, for writing amounts the way users think of them.
    pub fn whole(tokens: u64) -> Self {
        Self(U256::from(tokens) * U256::exp10(crate::token::DECIMALS as usize))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl From<u64> for Amount {
    fn from(raw: u64) -> Self {
        Self(U256::from(raw))
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(U256::from(raw))
    }
}

impl From<U256> for Amount {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s.trim())
            .map(Self)
            .map_err(|_| TypeError::InvalidAmount(s.to_string()))
    }
}

impl TryFrom<String> for Amount {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}
