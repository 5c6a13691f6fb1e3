//! Standing bids

use crate::asset::AssetKey;
use crate::ids::AccountId;
use crate::numeric::Amount;
use serde::{Deserialize, Serialize};

/// A bidder's standing offer to buy one asset at a stated amount.
///
/// At most one bid per (asset, bidder) exists at any time; re-bidding
/// replaces the prior bid wholesale. Bids are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub asset: AssetKey,
    pub bidder: AccountId,
    /// Offered amount, smallest currency unit, always positive
    pub amount: Amount,
    /// Placement sequence; earlier wins amount ties
    pub seq: u64,
}

impl Bid {
    pub fn new(asset: AssetKey, bidder: AccountId, amount: Amount, seq: u64) -> Self {
        Self {
            asset,
            bidder,
            amount,
            seq,
        }
    }

    /// Whether this bid ranks ahead of `other`: greater amount first,
    /// earlier placement on equal amounts.
    pub fn outranks(&self, other: &Bid) -> bool {
        self.amount > other.amount || (self.amount == other.amount && self.seq < other.seq)
    }
}
