//! Fixed-price listings

use crate::asset::AssetKey;
use crate::ids::AccountId;
use crate::numeric::Amount;
use serde::{Deserialize, Serialize};

/// A seller's standing fixed-price sell offer for one asset.
///
/// Presence in the listing book is what makes a listing active: it is
/// removed on match, cancellation, or invalidation, and never mutated in
/// place, so a stale-but-active listing is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub asset: AssetKey,
    pub seller: AccountId,
    /// Ask price, smallest currency unit, always positive
    pub price: Amount,
    /// Book insertion sequence; orders collection browsing
    pub seq: u64,
}

impl Listing {
    pub fn new(asset: AssetKey, seller: AccountId, price: Amount, seq: u64) -> Self {
        Self {
            asset,
            seller,
            price,
            seq,
        }
    }
}
