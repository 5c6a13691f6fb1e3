//! Error taxonomy for the marketplace core
//!
//! Every failing operation reports one of these kinds; none of them is
//! process-fatal and none is folded into a generic failure. A failed
//! operation leaves the books exactly as they were, with one exception:
//! stale-listing detection during a buy also invalidates the listing
//! before surfacing `NotOwner`.

use crate::asset::AssetKey;
use crate::ids::AccountId;
use crate::numeric::Amount;
use thiserror::Error;

/// Discriminated failure kinds for every book and settlement operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("invalid listing price: {price}")]
    InvalidPrice { price: Amount },

    #[error("invalid bid amount: {amount}")]
    InvalidAmount { amount: Amount },

    #[error("{account} does not own {asset}")]
    NotOwner { asset: AssetKey, account: AccountId },

    #[error("{caller} is not the seller of the listing for {asset}")]
    NotSeller { asset: AssetKey, caller: AccountId },

    #[error("{bidder} owns {asset} and cannot bid on it")]
    SelfBid { asset: AssetKey, bidder: AccountId },

    #[error("no active listing for {asset}")]
    NoSuchListing { asset: AssetKey },

    #[error("an active listing already exists for {asset}")]
    DuplicateListing { asset: AssetKey },

    #[error("no bid by {bidder} on {asset}")]
    NoSuchBid { asset: AssetKey, bidder: AccountId },

    #[error("listing price is {expected}, offered {offered}")]
    PriceMismatch { expected: Amount, offered: Amount },

    #[error("bid amount is {actual}, expected {expected}")]
    AmountMismatch { expected: Amount, actual: Amount },

    #[error("invalid fee configuration: {reason}")]
    InvalidConfiguration { reason: String },
}
