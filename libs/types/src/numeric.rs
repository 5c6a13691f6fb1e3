//! Monetary amounts
//!
//! Amounts are integers in the smallest currency unit; all arithmetic is
//! exact and deterministic (no floating-point anywhere in the settlement
//! path).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in the smallest currency unit.
///
/// Wide enough for 18-decimal on-chain denominations. Zero is representable
/// but rejected wherever an operation requires a positive price or amount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    pub const fn from_u64(units: u64) -> Self {
        Self(units as u128)
    }

    /// Raw value in smallest currency units
    pub const fn units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units as u128)
    }
}
