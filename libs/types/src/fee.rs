//! Fee schedule and settlement split arithmetic
//!
//! The split is pure integer arithmetic: truncating division only, so the
//! result is reproducible bit-for-bit across implementations. The rounding
//! remainder always lands in the seller's amount; no value is created or
//! destroyed.

use crate::errors::MarketError;
use crate::numeric::Amount;
use serde::{Deserialize, Serialize};

/// Basis-point denominator: 10000 = 100%
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Versioned marketplace fee configuration.
///
/// Never edited in place: reconfiguration produces a new value with a
/// bumped version, and each settlement uses the schedule snapshot taken at
/// its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub version: u64,
    /// Marketplace service fee, basis points of the sale price
    pub service_fee_bps: u16,
    /// Creator royalty, basis points of the sale price
    pub royalty_bps: u16,
}

/// Exact three-way division of a sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub seller_amount: Amount,
    pub service_fee: Amount,
    pub royalty_fee: Amount,
}

impl FeeSplit {
    /// Sum of all three legs; equals the input price by construction
    pub fn total(&self) -> Amount {
        Amount::new(
            self.seller_amount.units() + self.service_fee.units() + self.royalty_fee.units(),
        )
    }
}

impl FeeSchedule {
    /// Initial schedule, version 1.
    pub fn new(service_fee_bps: u16, royalty_bps: u16) -> Result<Self, MarketError> {
        Self::validate(service_fee_bps, royalty_bps)?;
        Ok(Self {
            version: 1,
            service_fee_bps,
            royalty_bps,
        })
    }

    /// Replacement schedule with the next version.
    pub fn reconfigured(&self, service_fee_bps: u16, royalty_bps: u16) -> Result<Self, MarketError> {
        Self::validate(service_fee_bps, royalty_bps)?;
        Ok(Self {
            version: self.version + 1,
            service_fee_bps,
            royalty_bps,
        })
    }

    fn validate(service_fee_bps: u16, royalty_bps: u16) -> Result<(), MarketError> {
        let combined = service_fee_bps as u64 + royalty_bps as u64;
        if combined > BPS_DENOMINATOR {
            return Err(MarketError::InvalidConfiguration {
                reason: format!(
                    "combined fees are {combined} bps, exceeding {BPS_DENOMINATOR}"
                ),
            });
        }
        Ok(())
    }

    /// Split a sale price into seller proceeds, service fee, and royalty.
    ///
    /// `service_fee = floor(price * service_fee_bps / 10000)`, likewise for
    /// the royalty; the seller receives the remainder, so the three legs
    /// always sum exactly to `price`.
    pub fn split(&self, price: Amount) -> Result<FeeSplit, MarketError> {
        Self::validate(self.service_fee_bps, self.royalty_bps)?;
        if price.is_zero() {
            return Err(MarketError::InvalidConfiguration {
                reason: "price must be positive".to_string(),
            });
        }

        let service_fee = floor_bps(price.units(), self.service_fee_bps);
        let royalty_fee = floor_bps(price.units(), self.royalty_bps);
        let seller_amount = price.units() - service_fee - royalty_fee;

        Ok(FeeSplit {
            seller_amount: Amount::new(seller_amount),
            service_fee: Amount::new(service_fee),
            royalty_fee: Amount::new(royalty_fee),
        })
    }
}

/// floor(units * bps / 10000), exact over the whole u128 domain.
///
/// Splitting into quotient and remainder keeps every intermediate product
/// within u128: q * bps <= units, and r * bps < 10^8.
fn floor_bps(units: u128, bps: u16) -> u128 {
    let denominator = BPS_DENOMINATOR as u128;
    let q = units / denominator;
    let r = units % denominator;
    q * bps as u128 + r * bps as u128 / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_reference_case() {
        // 100 units at service 250 bps + royalty 500 bps
        let schedule = FeeSchedule::new(250, 500).unwrap();
        let split = schedule.split(Amount::new(100)).unwrap();

        assert_eq!(split.service_fee, Amount::new(2));
        assert_eq!(split.royalty_fee, Amount::new(5));
        assert_eq!(split.seller_amount, Amount::new(93));
    }

    #[test]
    fn test_split_remainder_goes_to_seller() {
        // 3 units at 1 bp each: both fees floor to zero
        let schedule = FeeSchedule::new(1, 1).unwrap();
        let split = schedule.split(Amount::new(3)).unwrap();

        assert_eq!(split.service_fee, Amount::ZERO);
        assert_eq!(split.royalty_fee, Amount::ZERO);
        assert_eq!(split.seller_amount, Amount::new(3));
    }

    #[test]
    fn test_split_full_fee() {
        let schedule = FeeSchedule::new(9_000, 1_000).unwrap();
        let split = schedule.split(Amount::new(100)).unwrap();

        assert_eq!(split.seller_amount, Amount::ZERO);
        assert_eq!(split.service_fee, Amount::new(90));
        assert_eq!(split.royalty_fee, Amount::new(10));
    }

    #[test]
    fn test_split_rejects_zero_price() {
        let schedule = FeeSchedule::new(250, 500).unwrap();
        let err = schedule.split(Amount::ZERO).unwrap_err();
        assert!(matches!(err, MarketError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_schedule_rejects_excessive_fees() {
        let err = FeeSchedule::new(9_000, 1_001).unwrap_err();
        assert!(matches!(err, MarketError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_split_rejects_hand_built_invalid_schedule() {
        let schedule = FeeSchedule {
            version: 1,
            service_fee_bps: 8_000,
            royalty_bps: 8_000,
        };
        assert!(schedule.split(Amount::new(100)).is_err());
    }

    #[test]
    fn test_reconfigured_bumps_version() {
        let v1 = FeeSchedule::new(250, 500).unwrap();
        let v2 = v1.reconfigured(300, 500).unwrap();
        assert_eq!(v1.version, 1);
        assert_eq!(v2.version, 2);
        assert_eq!(v2.service_fee_bps, 300);
    }

    #[test]
    fn test_floor_bps_large_values() {
        // Near the top of the u128 domain the decomposed form must not wrap
        let units = u128::MAX - 5;
        assert_eq!(floor_bps(units, 10_000), units);
        assert_eq!(floor_bps(units, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_split_conserves_value(
            price in 1u128..=u128::MAX,
            service in 0u16..=10_000,
            royalty in 0u16..=10_000,
        ) {
            prop_assume!(service as u32 + royalty as u32 <= 10_000);
            let schedule = FeeSchedule::new(service, royalty).unwrap();
            let split = schedule.split(Amount::new(price)).unwrap();
            prop_assert_eq!(
                split.seller_amount.units() + split.service_fee.units() + split.royalty_fee.units(),
                price
            );
        }

        #[test]
        fn prop_fees_never_exceed_price(
            price in 1u128..=u128::MAX,
            service in 0u16..=5_000,
            royalty in 0u16..=5_000,
        ) {
            let schedule = FeeSchedule::new(service, royalty).unwrap();
            let split = schedule.split(Amount::new(price)).unwrap();
            prop_assert!(split.service_fee.units() <= price);
            prop_assert!(split.royalty_fee.units() <= price);
        }
    }
}
