//! Per-asset bid ladder
//!
//! Maintains the standing bids for one asset ordered by amount descending,
//! then placement sequence ascending (first placed wins ties). The ordered
//! index makes the highest-bid lookup O(log n) instead of a scan, and the
//! BTreeMap keys make iteration order deterministic.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use types::bid::Bid;
use types::ids::AccountId;
use types::numeric::Amount;

/// Ladder position of a bid: amount descending, then earliest placement.
type BidRank = (Reverse<Amount>, u64);

fn rank_of(bid: &Bid) -> BidRank {
    (Reverse(bid.amount), bid.seq)
}

/// All standing bids on a single asset, best first.
///
/// One outstanding bid per bidder; placing again replaces the prior bid
/// wholesale rather than mutating it.
#[derive(Debug, Default)]
pub struct BidLadder {
    /// Bids ordered best-first
    ranked: BTreeMap<BidRank, Bid>,
    /// Ladder position of each bidder's outstanding bid
    by_bidder: HashMap<AccountId, BidRank>,
}

impl BidLadder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bid, replacing this bidder's prior bid on the asset.
    ///
    /// Returns the replaced bid, if any.
    pub fn place(&mut self, bid: Bid) -> Option<Bid> {
        let replaced = self.remove(&bid.bidder);
        let rank = rank_of(&bid);
        self.by_bidder.insert(bid.bidder, rank);
        self.ranked.insert(rank, bid);
        replaced
    }

    /// Remove a bidder's outstanding bid
    ///
    /// Returns the removed bid, or None if the bidder has none.
    pub fn remove(&mut self, bidder: &AccountId) -> Option<Bid> {
        let rank = self.by_bidder.remove(bidder)?;
        self.ranked.remove(&rank)
    }

    /// A bidder's outstanding bid, if any
    pub fn get(&self, bidder: &AccountId) -> Option<&Bid> {
        let rank = self.by_bidder.get(bidder)?;
        self.ranked.get(rank)
    }

    /// The best bid: strictly greatest amount, earliest placement on ties
    pub fn highest(&self) -> Option<&Bid> {
        self.ranked.values().next()
    }

    /// Paginated window over the ladder, best-first
    pub fn page(&self, offset: usize, limit: usize) -> Vec<Bid> {
        self.ranked
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
