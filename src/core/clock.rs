// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Wall-clock sources
//!
//! Pulse intervals come from the sensor's monotonic timestamps. Everything
//! else (idle detection, integration between polls, session start) is
//! measured against a [`Clock`] so tests can drive time by hand.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Move the clock forward
    pub fn advance(&self, by: std::time::Duration) {
        let by = ChronoDuration::from_std(by).unwrap_or(ChronoDuration::zero());
        *self.now.lock() += by;
    }

    /// Move the clock by a signed number of milliseconds
    pub fn advance_millis(&self, millis: i64) {
        *self.now.lock() += ChronoDuration::milliseconds(millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Seconds from `earlier` to `later`, zero if the clock went backwards
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier)
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        clock.advance(std::time::Duration::from_millis(1500));
        assert_eq!(seconds_between(start, clock.now()), 1.5);

        clock.advance_millis(-500);
        assert_eq!(seconds_between(start, clock.now()), 1.0);
    }

    #[test]
    fn test_seconds_between_clamps_negative() {
        let later = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 10).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(seconds_between(later, earlier), 0.0);
        assert_eq!(seconds_between(earlier, later), 10.0);
    }
}
