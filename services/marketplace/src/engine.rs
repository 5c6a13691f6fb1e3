//! Marketplace engine
//!
//! Coordinates the listing and bid books per asset key: buy-now matches,
//! bid acceptance, cancellations, and invalidation of offers the ownership
//! registry has made stale. Every operation is a single atomic step with
//! its own pre/postconditions; there is no multi-phase negotiation state.
//!
//! **Key invariants:**
//! - At most one active listing per asset key
//! - At most one bid per (asset key, bidder)
//! - Settlement splits sum exactly to the sale price
//! - A listing survives only while the oracle last confirmed its seller
//!   owns the asset

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tracing::{debug, info};

use types::asset::AssetKey;
use types::bid::Bid;
use types::errors::MarketError;
use types::fee::FeeSchedule;
use types::ids::{AccountId, CollectionId};
use types::listing::Listing;
use types::numeric::Amount;

use crate::book::{AssetBook, ListingIndex};
use crate::events::{ListingCancelled, ListingInvalidated, OwnershipSync, SaleKind, Sold};
use crate::oracle::OwnershipOracle;

/// Listing/bid book and settlement core.
///
/// State for one asset key lives under a single map entry and the entry
/// guard is held for the whole operation, so each public operation is
/// atomic for the key it touches while operations on different keys run
/// in parallel (dashmap shard granularity). The fee schedule is swapped
/// as a whole value; a settlement in flight keeps the snapshot it took
/// at its start.
pub struct Marketplace {
    /// Offer state per asset key
    books: DashMap<AssetKey, AssetBook>,
    /// Insertion-ordered browsing index per collection
    listing_index: ListingIndex,
    /// Current fee schedule; replaced wholesale on reconfiguration
    fees: RwLock<Arc<FeeSchedule>>,
    /// Royalty recipient per collection
    royalty_recipients: DashMap<CollectionId, AccountId>,
    oracle: Arc<dyn OwnershipOracle>,
    /// Orders listings, bids and settlements engine-wide
    sequence: AtomicU64,
}

impl Marketplace {
    pub fn new(oracle: Arc<dyn OwnershipOracle>, fees: FeeSchedule) -> Self {
        Self {
            books: DashMap::new(),
            listing_index: ListingIndex::new(),
            fees: RwLock::new(Arc::new(fees)),
            royalty_recipients: DashMap::new(),
            oracle,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn fee_snapshot(&self) -> Arc<FeeSchedule> {
        self.fees.read().expect("fee schedule lock poisoned").clone()
    }

    fn drop_if_empty(&self, asset: &AssetKey) {
        self.books.remove_if(asset, |_, book| book.is_empty());
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// Post a fixed-price listing for an asset the seller currently owns.
    pub fn create_listing(
        &self,
        asset: AssetKey,
        seller: AccountId,
        price: Amount,
    ) -> Result<Listing, MarketError> {
        if price.is_zero() {
            return Err(MarketError::InvalidPrice { price });
        }
        if self.oracle.current_owner(&asset) != Some(seller) {
            return Err(MarketError::NotOwner {
                asset,
                account: seller,
            });
        }

        let mut book = self.books.entry(asset.clone()).or_default();
        if book.listing.is_some() {
            return Err(MarketError::DuplicateListing { asset });
        }

        let listing = Listing::new(asset.clone(), seller, price, self.next_seq());
        book.listing = Some(listing.clone());
        self.listing_index.insert(listing.seq, asset);
        drop(book);

        debug!(asset = %listing.asset, seller = %seller, price = %price, "listing created");
        Ok(listing)
    }

    /// Remove a listing at its seller's request.
    pub fn cancel_listing(
        &self,
        asset: &AssetKey,
        caller: AccountId,
    ) -> Result<ListingCancelled, MarketError> {
        let mut book = self
            .books
            .get_mut(asset)
            .ok_or_else(|| MarketError::NoSuchListing {
                asset: asset.clone(),
            })?;
        let listing = book
            .listing
            .clone()
            .ok_or_else(|| MarketError::NoSuchListing {
                asset: asset.clone(),
            })?;
        if listing.seller != caller {
            return Err(MarketError::NotSeller {
                asset: asset.clone(),
                caller,
            });
        }

        book.listing = None;
        self.listing_index.remove(asset, listing.seq);
        drop(book);
        self.drop_if_empty(asset);

        debug!(asset = %asset, seller = %caller, "listing cancelled");
        Ok(ListingCancelled {
            sequence: self.next_seq(),
            listing,
        })
    }

    /// Active listing for an asset, if any.
    pub fn listing(&self, asset: &AssetKey) -> Option<Listing> {
        self.books.get(asset).and_then(|book| book.listing.clone())
    }

    /// Active listings of a collection in insertion order, paginated.
    ///
    /// The window is stable only while no mutation lands between pages.
    pub fn listings(
        &self,
        collection: &CollectionId,
        offset: usize,
        limit: usize,
    ) -> Vec<Listing> {
        self.listing_index
            .page(collection, offset, limit)
            .into_iter()
            .filter_map(|asset| self.listing(&asset))
            .collect()
    }

    // ------------------------------------------------------------------
    // Bids
    // ------------------------------------------------------------------

    /// Place a standing bid, replacing the bidder's prior bid on the asset.
    ///
    /// Replacement discards the old amount outright; refund and escrow
    /// accounting belong to the external payment channel.
    pub fn place_bid(
        &self,
        asset: AssetKey,
        bidder: AccountId,
        amount: Amount,
    ) -> Result<Bid, MarketError> {
        if amount.is_zero() {
            return Err(MarketError::InvalidAmount { amount });
        }
        if self.oracle.current_owner(&asset) == Some(bidder) {
            return Err(MarketError::SelfBid { asset, bidder });
        }

        let bid = Bid::new(asset.clone(), bidder, amount, self.next_seq());
        let mut book = self.books.entry(asset).or_default();
        let replaced = book.bids.place(bid.clone());
        drop(book);

        match replaced {
            Some(prior) => debug!(
                asset = %bid.asset, bidder = %bidder, amount = %amount,
                prior_amount = %prior.amount, "bid replaced"
            ),
            None => debug!(asset = %bid.asset, bidder = %bidder, amount = %amount, "bid placed"),
        }
        Ok(bid)
    }

    /// Withdraw a bidder's standing bid.
    pub fn withdraw_bid(&self, asset: &AssetKey, bidder: AccountId) -> Result<Bid, MarketError> {
        let mut book = self
            .books
            .get_mut(asset)
            .ok_or_else(|| MarketError::NoSuchBid {
                asset: asset.clone(),
                bidder,
            })?;
        let bid = book
            .bids
            .remove(&bidder)
            .ok_or_else(|| MarketError::NoSuchBid {
                asset: asset.clone(),
                bidder,
            })?;
        drop(book);
        self.drop_if_empty(asset);

        debug!(asset = %asset, bidder = %bidder, "bid withdrawn");
        Ok(bid)
    }

    /// Best standing bid: strictly greatest amount, earliest placement on
    /// ties. Answered from the ordered ladder, never by scanning.
    pub fn highest_bid(&self, asset: &AssetKey) -> Option<Bid> {
        self.books
            .get(asset)
            .and_then(|book| book.bids.highest().cloned())
    }

    /// Bids on an asset ordered by amount descending then placement
    /// ascending, paginated.
    pub fn bids(&self, asset: &AssetKey, offset: usize, limit: usize) -> Vec<Bid> {
        self.books
            .get(asset)
            .map(|book| book.bids.page(offset, limit))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Settlement
    // ------------------------------------------------------------------

    /// Match a buyer against the active listing at its exact price.
    ///
    /// A listing whose seller no longer owns the asset is invalidated on
    /// the spot before `NotOwner` is returned, so a retrying caller finds
    /// a clean book.
    pub fn buy_now(
        &self,
        asset: &AssetKey,
        buyer: AccountId,
        offered: Amount,
    ) -> Result<Sold, MarketError> {
        let fees = self.fee_snapshot();

        let mut book = self
            .books
            .get_mut(asset)
            .ok_or_else(|| MarketError::NoSuchListing {
                asset: asset.clone(),
            })?;
        let listing = book
            .listing
            .clone()
            .ok_or_else(|| MarketError::NoSuchListing {
                asset: asset.clone(),
            })?;

        if offered != listing.price {
            return Err(MarketError::PriceMismatch {
                expected: listing.price,
                offered,
            });
        }

        if self.oracle.current_owner(asset) != Some(listing.seller) {
            // stale listing: heal the book before surfacing the error
            book.listing = None;
            self.listing_index.remove(asset, listing.seq);
            drop(book);
            self.drop_if_empty(asset);
            info!(asset = %asset, seller = %listing.seller, "stale listing invalidated on buy");
            return Err(MarketError::NotOwner {
                asset: asset.clone(),
                account: listing.seller,
            });
        }

        let split = fees.split(listing.price)?;
        book.listing = None;
        // the buyer becomes the owner; their own standing bid dies with the sale
        book.bids.remove(&buyer);
        self.listing_index.remove(asset, listing.seq);
        drop(book);
        self.drop_if_empty(asset);

        let sold = Sold {
            sequence: self.next_seq(),
            kind: SaleKind::BuyNow,
            asset: asset.clone(),
            seller: listing.seller,
            buyer,
            price: listing.price,
            split,
            royalty_recipient: self.royalty_recipient(&asset.collection),
            fee_version: fees.version,
        };
        info!(
            asset = %asset, seller = %sold.seller, buyer = %buyer, price = %sold.price,
            "asset bought"
        );
        Ok(sold)
    }

    /// Settle a sale between the asset's current owner and a bidder.
    ///
    /// `expected` is the bid amount the seller last observed; a bid that
    /// changed in between fails `AmountMismatch` instead of settling at a
    /// surprise price. Acceptance supersedes any active listing for the
    /// asset and does not require one to exist.
    pub fn accept_bid(
        &self,
        asset: &AssetKey,
        seller: AccountId,
        bidder: AccountId,
        expected: Amount,
    ) -> Result<Sold, MarketError> {
        let fees = self.fee_snapshot();

        if self.oracle.current_owner(asset) != Some(seller) {
            return Err(MarketError::NotOwner {
                asset: asset.clone(),
                account: seller,
            });
        }

        let mut book = self
            .books
            .get_mut(asset)
            .ok_or_else(|| MarketError::NoSuchBid {
                asset: asset.clone(),
                bidder,
            })?;
        let bid = book
            .bids
            .get(&bidder)
            .cloned()
            .ok_or_else(|| MarketError::NoSuchBid {
                asset: asset.clone(),
                bidder,
            })?;
        if bid.amount != expected {
            return Err(MarketError::AmountMismatch {
                expected,
                actual: bid.amount,
            });
        }

        let split = fees.split(bid.amount)?;
        book.bids.remove(&bidder);
        // any listing on the asset cannot outlive the sale, whoever posted it
        if let Some(listing) = book.listing.take() {
            self.listing_index.remove(asset, listing.seq);
        }
        drop(book);
        self.drop_if_empty(asset);

        let sold = Sold {
            sequence: self.next_seq(),
            kind: SaleKind::BidAccepted,
            asset: asset.clone(),
            seller,
            buyer: bidder,
            price: bid.amount,
            split,
            royalty_recipient: self.royalty_recipient(&asset.collection),
            fee_version: fees.version,
        };
        info!(
            asset = %asset, seller = %seller, bidder = %bidder, price = %sold.price,
            "bid accepted"
        );
        Ok(sold)
    }

    /// Absorb an ownership change that happened outside the marketplace.
    ///
    /// Invalidates any active listing for the asset and removes the new
    /// owner's own bid. Idempotent; touches nothing when there is nothing
    /// to heal.
    pub fn on_ownership_changed(&self, asset: &AssetKey, new_owner: AccountId) -> OwnershipSync {
        let Some(mut book) = self.books.get_mut(asset) else {
            return OwnershipSync::default();
        };

        let invalidated = book.listing.take().map(|listing| {
            self.listing_index.remove(asset, listing.seq);
            info!(asset = %asset, seller = %listing.seller, "listing invalidated by transfer");
            ListingInvalidated {
                sequence: self.next_seq(),
                listing,
            }
        });
        let removed_bid = book.bids.remove(&new_owner);
        if removed_bid.is_some() {
            debug!(asset = %asset, bidder = %new_owner, "new owner's bid removed");
        }
        drop(book);
        self.drop_if_empty(asset);

        OwnershipSync {
            invalidated,
            removed_bid,
        }
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Current fee schedule snapshot.
    pub fn fee_schedule(&self) -> Arc<FeeSchedule> {
        self.fee_snapshot()
    }

    /// Install a new fee schedule atomically, bumping the version.
    ///
    /// Settlements already in flight finish under the schedule they
    /// snapshotted at their start.
    pub fn reconfigure_fees(
        &self,
        service_fee_bps: u16,
        royalty_bps: u16,
    ) -> Result<Arc<FeeSchedule>, MarketError> {
        let mut slot = self.fees.write().expect("fee schedule lock poisoned");
        let next = Arc::new(slot.reconfigured(service_fee_bps, royalty_bps)?);
        *slot = next.clone();
        info!(
            version = next.version,
            service_fee_bps, royalty_bps, "fee schedule reconfigured"
        );
        Ok(next)
    }

    /// Register the royalty recipient for a collection.
    pub fn set_royalty_recipient(&self, collection: CollectionId, recipient: AccountId) {
        self.royalty_recipients.insert(collection, recipient);
    }

    /// Royalty recipient for a collection, when registered.
    pub fn royalty_recipient(&self, collection: &CollectionId) -> Option<AccountId> {
        self.royalty_recipients
            .get(collection)
            .map(|recipient| *recipient)
    }
}
