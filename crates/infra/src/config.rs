//! Configuration loading and representation.
//!
//! Everything is read from environment variables; unset variables fall back to
//! the defaults below.

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;
use tracing::debug;

use storefront_core::{Money, SystemClock};
use storefront_orders::DiscountPolicy;

pub const DISCOUNT_THRESHOLD_VAR: &str = "STOREFRONT_DISCOUNT_THRESHOLD";
pub const DISCOUNT_RATE_PERCENT_VAR: &str = "STOREFRONT_DISCOUNT_RATE_PERCENT";
pub const TIMEZONE_OFFSET_MINUTES_VAR: &str = "STOREFRONT_TIMEZONE_OFFSET_MINUTES";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Runtime settings for the order services.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub discount: DiscountPolicy,
    /// Offset the business day is counted in when stamping issue dates.
    pub timezone_offset: FixedOffset,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            discount: DiscountPolicy::default(),
            timezone_offset: Utc.fix(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let threshold = match lookup(DISCOUNT_THRESHOLD_VAR) {
            Some(raw) => raw
                .parse::<Money>()
                .map_err(|e| ConfigError::invalid(DISCOUNT_THRESHOLD_VAR, &raw, e))?,
            None => {
                debug!(key = DISCOUNT_THRESHOLD_VAR, "not set; using default");
                defaults.discount.threshold()
            }
        };

        let (rate_percent, raw_rate) = match lookup(DISCOUNT_RATE_PERCENT_VAR) {
            Some(raw) => {
                let rate = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| ConfigError::invalid(DISCOUNT_RATE_PERCENT_VAR, &raw, e))?;
                (rate, raw)
            }
            None => {
                debug!(key = DISCOUNT_RATE_PERCENT_VAR, "not set; using default");
                let rate = defaults.discount.rate_percent();
                (rate, rate.to_string())
            }
        };

        let discount = DiscountPolicy::new(threshold, rate_percent)
            .map_err(|e| ConfigError::invalid(DISCOUNT_RATE_PERCENT_VAR, &raw_rate, e))?;

        let timezone_offset = match lookup(TIMEZONE_OFFSET_MINUTES_VAR) {
            Some(raw) => {
                let minutes = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| ConfigError::invalid(TIMEZONE_OFFSET_MINUTES_VAR, &raw, e))?;
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        ConfigError::invalid(TIMEZONE_OFFSET_MINUTES_VAR, &raw, "offset out of range")
                    })?
            }
            None => {
                debug!(key = TIMEZONE_OFFSET_MINUTES_VAR, "not set; using UTC");
                defaults.timezone_offset
            }
        };

        Ok(Self {
            discount,
            timezone_offset,
        })
    }

    /// Live clock reporting dates in the configured offset.
    pub fn clock(&self) -> SystemClock {
        SystemClock::with_offset(self.timezone_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.discount, DiscountPolicy::default());
        assert_eq!(config.timezone_offset.local_minus_utc(), 0);
    }

    #[test]
    fn reads_all_settings() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (DISCOUNT_THRESHOLD_VAR, "250.00"),
            (DISCOUNT_RATE_PERCENT_VAR, "10"),
            (TIMEZONE_OFFSET_MINUTES_VAR, "-300"),
        ]))
        .unwrap();

        assert_eq!(config.discount.threshold(), Money::from(250u32));
        assert_eq!(config.discount.rate_percent(), 10);
        assert_eq!(config.timezone_offset.local_minus_utc(), -300 * 60);
        assert_eq!(config.clock(), SystemClock::with_offset(config.timezone_offset));
    }

    #[test]
    fn malformed_values_name_the_key() {
        let err = StorefrontConfig::from_lookup(lookup(&[(DISCOUNT_RATE_PERCENT_VAR, "five")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == DISCOUNT_RATE_PERCENT_VAR));

        let err = StorefrontConfig::from_lookup(lookup(&[(DISCOUNT_THRESHOLD_VAR, "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == DISCOUNT_THRESHOLD_VAR));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = StorefrontConfig::from_lookup(lookup(&[(DISCOUNT_RATE_PERCENT_VAR, "150")]))
            .unwrap_err();
        assert!(err.to_string().contains("150"));

        let err =
            StorefrontConfig::from_lookup(lookup(&[(TIMEZONE_OFFSET_MINUTES_VAR, "2000")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == TIMEZONE_OFFSET_MINUTES_VAR));
    }
}
