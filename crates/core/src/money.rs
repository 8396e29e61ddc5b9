//! Monetary amounts.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Non-negative amount of money in whole currency units with a decimal fraction,
/// capped at [`Money::MAX_UNITS`].
///
/// The cap keeps every product the domain computes (line totals, percentages)
/// far inside `Decimal`'s range, so arithmetic here never overflows. Sums that
/// would pass the cap are reported through the `checked_*` methods.
///
/// Serialized as a decimal string (`"12.50"`). Deserialization applies the same
/// checks as [`Money::new`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Largest representable amount: one quadrillion units.
    pub const MAX_UNITS: u64 = 1_000_000_000_000_000;

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::invalid_argument(format!(
                "money amount must not be negative (got {amount})"
            )));
        }
        if amount > Self::max_amount() {
            return Err(DomainError::invalid_argument(format!(
                "money amount must not exceed {} (got {amount})",
                Self::MAX_UNITS
            )));
        }
        Ok(Self(amount))
    }

    pub fn max() -> Money {
        Money(Self::max_amount())
    }

    fn max_amount() -> Decimal {
        Decimal::from(Self::MAX_UNITS)
    }

    /// `None` once `amount` leaves the representable range.
    fn bounded(amount: Option<Decimal>) -> Option<Money> {
        amount.and_then(|a| Money::new(a).ok())
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Price of `quantity` units at this unit price, `None` past [`Money::MAX_UNITS`].
    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        Self::bounded(self.0.checked_mul(Decimal::from(quantity)))
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        Self::bounded(self.0.checked_add(rhs.0))
    }

    /// Subtraction that refuses to go below zero.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        Self::bounded(self.0.checked_sub(rhs.0))
    }

    /// `rate_percent` percent of this amount, truncated to a whole currency unit.
    ///
    /// The amount is scaled first and divided second, so `100 × 5 / 100` is
    /// exactly `5` and `199 × 5 / 100 = 9.95` truncates to `9`. Rates above 100
    /// yield at most [`Money::max`].
    pub fn percent_truncated(self, rate_percent: u32) -> Money {
        // MAX_UNITS × u32::MAX is about 4.3e24, well below Decimal::MAX (7.9e28).
        let scaled = self.0.saturating_mul(Decimal::from(rate_percent));
        let percent = (scaled / Decimal::ONE_HUNDRED).trunc();
        Money(percent.min(Self::max_amount()))
    }
}

impl From<u32> for Money {
    fn from(units: u32) -> Self {
        Money(Decimal::from(units))
    }
}

impl TryFrom<u64> for Money {
    type Error = DomainError;

    fn try_from(units: u64) -> Result<Self, Self::Error> {
        Money::new(Decimal::from(units))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::invalid_argument(format!("malformed amount {s:?}: {e}")))?;
        Money::new(amount)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = Money::new(Decimal::NEGATIVE_ONE).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!("-0.01".parse::<Money>().is_err());
    }

    #[test]
    fn amounts_past_the_cap_are_rejected() {
        assert_eq!(Money::try_from(Money::MAX_UNITS).unwrap(), Money::max());

        for raw in ["1000000000000000.01", "20000000000000000000000000000", "79228162514264337593543950335"] {
            let err = raw.parse::<Money>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(msg) if msg.contains("exceed")));
        }
        assert!(Money::try_from(u64::MAX).is_err());
        assert!(serde_json::from_str::<Money>("\"79228162514264337593543950335\"").is_err());
    }

    #[test]
    fn percent_truncates_toward_zero() {
        assert_eq!(Money::from(100u32).percent_truncated(5), Money::from(5u32));
        assert_eq!(Money::from(199u32).percent_truncated(5), Money::from(9u32));
        assert_eq!(money("100.50").percent_truncated(5), Money::from(5u32));
        assert_eq!(Money::from(99u32).percent_truncated(5), Money::from(4u32));
    }

    #[test]
    fn percent_of_the_largest_amount_stays_in_range() {
        assert_eq!(
            Money::max().percent_truncated(5),
            Money::try_from(Money::MAX_UNITS / 20).unwrap()
        );
        assert_eq!(Money::max().percent_truncated(u32::MAX), Money::max());
    }

    #[test]
    fn checked_sub_stops_at_zero() {
        assert_eq!(Money::from(10u32).checked_sub(Money::from(10u32)), Some(Money::ZERO));
        assert!(Money::from(10u32).checked_sub(Money::from(10u32)).unwrap().is_zero());
        assert_eq!(Money::from(10u32).checked_sub(Money::from(11u32)), None);
        assert_eq!(money("95.50").checked_sub(money("0.50")), Some(Money::from(95u32)));
    }

    #[test]
    fn checked_times_and_add() {
        assert_eq!(money("2.50").checked_times(2), Some(Money::from(5u32)));
        assert_eq!(
            Money::from(3u32).checked_add(money("0.25")),
            Some(money("3.25"))
        );
    }

    #[test]
    fn checked_ops_refuse_to_leave_the_range() {
        assert_eq!(Money::max().checked_times(2), None);
        assert_eq!(Money::max().checked_times(1), Some(Money::max()));
        assert_eq!(Money::max().checked_add(money("0.01")), None);
        assert_eq!(Money::max().checked_times(u32::MAX), None);
    }

    #[test]
    fn serializes_as_decimal_string_and_rejects_negative_input() {
        let json = serde_json::to_string(&money("12.50")).unwrap();
        assert_eq!(json, "\"12.50\"");

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money("12.50"));

        assert!(serde_json::from_str::<Money>("\"-1\"").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a truncated percentage never exceeds the exact percentage
        /// and is always a whole number of units.
        #[test]
        fn percent_truncated_is_whole_and_bounded(cents in 0u64..100_000_000u64, rate in 0u32..=100u32) {
            let amount = Money::new(Decimal::new(cents as i64, 2)).unwrap();
            let exact = amount.amount() * Decimal::from(rate) / Decimal::ONE_HUNDRED;
            let truncated = amount.percent_truncated(rate).amount();

            prop_assert!(truncated <= exact);
            prop_assert!(exact - truncated < Decimal::ONE);
            prop_assert_eq!(truncated.fract(), Decimal::ZERO);
        }
    }
}
