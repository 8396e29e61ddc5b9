//! Order discount rules.

use storefront_core::{DomainError, DomainResult, Money};

/// Percentage discount granted once the cart total reaches a threshold.
///
/// The discount is truncated to whole currency units: `199 × 5% = 9.95`
/// yields a discount of `9`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DiscountPolicy {
    threshold: Money,
    rate_percent: u32,
}

impl DiscountPolicy {
    pub const DEFAULT_THRESHOLD: u32 = 100;
    pub const DEFAULT_RATE_PERCENT: u32 = 5;

    pub fn new(threshold: Money, rate_percent: u32) -> DomainResult<Self> {
        if rate_percent > 100 {
            return Err(DomainError::invalid_argument(format!(
                "discount rate must be at most 100% (got {rate_percent}%)"
            )));
        }
        Ok(Self {
            threshold,
            rate_percent,
        })
    }

    pub fn threshold(&self) -> Money {
        self.threshold
    }

    pub fn rate_percent(&self) -> u32 {
        self.rate_percent
    }

    pub fn discount_for(&self, total: Money) -> Money {
        if total < self.threshold {
            Money::ZERO
        } else {
            total.percent_truncated(self.rate_percent)
        }
    }

    /// `total` minus its discount.
    pub fn price_for(&self, total: Money) -> Money {
        // rate_percent <= 100 keeps the discount within the total.
        total
            .checked_sub(self.discount_for(total))
            .unwrap_or(Money::ZERO)
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self {
            threshold: Money::from(Self::DEFAULT_THRESHOLD),
            rate_percent: Self::DEFAULT_RATE_PERCENT,
        }
    }
}
