//! Time capability passed into domain operations.
//!
//! Domain code never reads the ambient system clock. Anything that needs
//! "today" takes a [`Clock`], so tests can freeze time and deployments can pick
//! the timezone the business day is counted in.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Utc};

/// Provider of the current instant.
pub trait Clock: Send + Sync {
    /// Current instant, in the offset this clock reports dates in.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar date of [`Clock::now`], without time of day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl<C> Clock for &C
where
    C: Clock + ?Sized,
{
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

impl<C> Clock for Arc<C>
where
    C: Clock + ?Sized,
{
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// Live system time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SystemClock {
    /// `None` follows the host's local timezone.
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn utc() -> Self {
        Self {
            offset: Some(Utc.fix()),
        }
    }

    pub fn local() -> Self {
        Self { offset: None }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Frozen clock for tests and replays.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Midnight UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let instant = date.and_time(NaiveTime::MIN).and_utc().fixed_offset();
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_date() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let clock = FixedClock::at_date(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn today_uses_the_clock_offset() {
        // 2023-05-01 23:30 UTC is already 2023-05-02 in UTC+02:00.
        let utc = DateTime::parse_from_rfc3339("2023-05-01T23:30:00+00:00").unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(
            FixedClock::new(utc).today(),
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
        assert_eq!(
            FixedClock::new(utc.with_timezone(&plus_two)).today(),
            NaiveDate::from_ymd_opt(2023, 5, 2).unwrap()
        );
    }

    #[test]
    fn system_clock_honours_configured_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = SystemClock::with_offset(offset).now();
        assert_eq!(now.offset(), &offset);
        assert_eq!(SystemClock::utc().now().offset().local_minus_utc(), 0);
    }

    #[test]
    fn shared_clocks_delegate() {
        let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        let by_ref: &dyn Clock = &clock;
        assert_eq!(by_ref.today(), clock.today());
    }
}
