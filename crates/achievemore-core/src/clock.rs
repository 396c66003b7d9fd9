//! Wall-clock abstraction.
//!
//! Every temporal decision in the engine reads "now" through a [`Clock`], so
//! tests can drive time explicitly with [`ManualClock`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use parking_lot::Mutex;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in local time.
    fn today(&self) -> NaiveDate {
        calendar_day(self.now())
    }
}

/// Calendar day (local time) an instant falls on.
pub fn calendar_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle while the
/// engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::minutes(90));
        assert_eq!(clock.now(), start + Duration::minutes(90));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn today_uses_local_calendar_day() {
        let noon = Local
            .with_ymd_and_hms(2026, 6, 10, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let clock = ManualClock::new(noon);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 6, 10).unwrap());
    }
}
