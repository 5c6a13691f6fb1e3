//! Settlement records
//!
//! Immutable records returned from engine operations and consumed by the
//! external payment/ownership-transfer channel. Emitting a correct,
//! fully-specified record is where the core's obligation ends: it moves
//! no funds and transfers no assets.

use serde::{Deserialize, Serialize};
use types::asset::AssetKey;
use types::bid::Bid;
use types::fee::FeeSplit;
use types::ids::AccountId;
use types::listing::Listing;
use types::numeric::Amount;

/// How a sale was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleKind {
    /// Buyer matched an active listing at its exact price
    BuyNow,
    /// Seller accepted a standing bid
    BidAccepted,
}

/// The settlement instruction for one completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sold {
    /// Engine-wide settlement ordering
    pub sequence: u64,
    pub kind: SaleKind,
    pub asset: AssetKey,
    pub seller: AccountId,
    pub buyer: AccountId,
    pub price: Amount,
    pub split: FeeSplit,
    /// Resolved royalty recipient for the collection, when registered
    pub royalty_recipient: Option<AccountId>,
    /// Fee schedule version the split was computed under
    pub fee_version: u64,
}

/// A listing removed by its seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingCancelled {
    pub sequence: u64,
    pub listing: Listing,
}

/// A listing removed because its seller no longer owns the asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingInvalidated {
    pub sequence: u64,
    pub listing: Listing,
}

/// Outcome of absorbing an ownership change that happened outside the
/// marketplace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipSync {
    pub invalidated: Option<ListingInvalidated>,
    /// The new owner's own bid, removed to uphold no-self-bid
    pub removed_bid: Option<Bid>,
}

impl OwnershipSync {
    /// True when the change touched nothing in the books
    pub fn is_noop(&self) -> bool {
        self.invalidated.is_none() && self.removed_bid.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::fee::FeeSchedule;
    use types::ids::CollectionId;

    #[test]
    fn test_sold_record_round_trips() {
        let asset = AssetKey::new(CollectionId::new("gallery"), 1u64);
        let split = FeeSchedule::new(250, 500)
            .unwrap()
            .split(Amount::new(100))
            .unwrap();
        let sold = Sold {
            sequence: 9,
            kind: SaleKind::BuyNow,
            asset,
            seller: AccountId::new(),
            buyer: AccountId::new(),
            price: Amount::new(100),
            split,
            royalty_recipient: Some(AccountId::new()),
            fee_version: 1,
        };

        let json = serde_json::to_string(&sold).unwrap();
        let deserialized: Sold = serde_json::from_str(&json).unwrap();
        assert_eq!(sold, deserialized);
    }

    #[test]
    fn test_sale_kind_wire_names() {
        assert_eq!(serde_json::to_string(&SaleKind::BuyNow).unwrap(), "\"BUY_NOW\"");
        assert_eq!(
            serde_json::to_string(&SaleKind::BidAccepted).unwrap(),
            "\"BID_ACCEPTED\""
        );
    }

    #[test]
    fn test_ownership_sync_noop() {
        assert!(OwnershipSync::default().is_noop());
    }
}
