use std::{fmt, str::FromStr};

use alloy::primitives::{U256, utils::parse_ether};
use rust_decimal::{Decimal, prelude::FromPrimitive};

/// Fixed decimal scale of the chain's native currency.
pub const ETH_DECIMALS: u32 = 18;

const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Native currency amount in wei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wei(U256);

impl Wei {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Parse a human ether amount such as `"4.2"`.
    pub fn parse_ether(value: &str) -> Option<Self> {
        parse_ether(value.trim()).ok().map(Self)
    }

    /// Display-scale value. Amounts beyond the decimal range keep whole ether only.
    pub fn to_ether(&self) -> Decimal {
        let scaled = u128::try_from(self.0)
            .ok()
            .and_then(|raw| i128::try_from(raw).ok())
            .and_then(|raw| Decimal::try_from_i128_with_scale(raw, ETH_DECIMALS).ok());

        match scaled {
            Some(value) => value,
            None => {
                let whole = u128::try_from(self.0 / WEI_PER_ETHER).unwrap_or(u128::MAX);
                Decimal::from_u128(whole).unwrap_or(Decimal::MAX)
            }
        }
    }

    /// Ether rendered with a fixed number of fractional digits.
    pub fn display(&self, precision: usize) -> String {
        format!("{:.precision$}", self.to_ether())
    }
}

impl From<U256> for Wei {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NounId(U256);

impl NounId {
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for NounId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NounId {
    type Err = alloy::primitives::ruint::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u256(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalId(U256);

impl ProposalId {
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProposalId {
    type Err = alloy::primitives::ruint::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u256(s).map(Self)
    }
}

/// Decimal, or hex when `0x`-prefixed.
pub fn parse_u256(s: &str) -> Result<U256, alloy::primitives::ruint::ParseError> {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        U256::from_str_radix(stripped, 16)
    } else {
        U256::from_str_radix(s, 10)
    }
}
