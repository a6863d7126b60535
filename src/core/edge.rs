// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Debounced edge counting

use std::time::Duration;
use chrono::{DateTime, Utc};

use super::Session;
use crate::config::DEBOUNCE_THRESHOLD;
use crate::sensors::EdgeEvent;

/// What a single edge did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    /// Not a falling edge
    Ignored,
    /// First pulse of the session, no interval yet
    First,
    /// Counted, carrying the new interval
    Accepted(Duration),
    /// Inside the debounce window, carrying the gap to the previous raw edge
    Bounce(Duration),
}

impl Session {
    /// Apply one edge event. `wall_now` is recorded for accepted pulses only.
    pub fn apply_edge(&mut self, event: EdgeEvent, wall_now: DateTime<Utc>) -> PulseOutcome {
        if !event.is_falling() {
            return PulseOutcome::Ignored;
        }

        let outcome = match self.last_timestamp {
            None => PulseOutcome::First,
            Some(previous) => {
                // An out-of-order timestamp saturates to zero and counts as bounce
                let dt = event.timestamp.saturating_sub(previous);
                if dt <= DEBOUNCE_THRESHOLD {
                    // The window slides even though nothing is counted
                    self.last_timestamp = Some(event.timestamp);
                    return PulseOutcome::Bounce(dt);
                }
                self.last_interval = dt;
                PulseOutcome::Accepted(dt)
            }
        };

        self.total_revolutions += 1;
        self.last_timestamp = Some(event.timestamp);
        self.last_pulse_wall = Some(wall_now);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn wall() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_first_pulse_counts_without_interval() {
        let mut session = Session::new(wall());
        let outcome = session.apply_edge(EdgeEvent::falling(ms(1000)), wall());

        assert_eq!(outcome, PulseOutcome::First);
        assert_eq!(session.total_revolutions, 1);
        assert_eq!(session.last_interval, Duration::ZERO);
        assert_eq!(session.last_timestamp, Some(ms(1000)));
        assert_eq!(session.last_pulse_wall, Some(wall()));
    }

    #[test]
    fn test_first_pulse_at_time_zero_is_recorded() {
        let mut session = Session::new(wall());
        session.apply_edge(EdgeEvent::falling(Duration::ZERO), wall());
        let outcome = session.apply_edge(EdgeEvent::falling(ms(400)), wall());

        assert_eq!(outcome, PulseOutcome::Accepted(ms(400)));
        assert_eq!(session.total_revolutions, 2);
    }

    #[test]
    fn test_rising_edges_are_ignored() {
        let mut session = Session::new(wall());
        let before = session.clone();

        assert_eq!(session.apply_edge(EdgeEvent::rising(ms(5)), wall()), PulseOutcome::Ignored);
        assert_eq!(session, before);
    }

    #[test]
    fn test_accepted_pulse_sets_interval() {
        let mut session = Session::new(wall());
        session.apply_edge(EdgeEvent::falling(ms(100)), wall());
        let outcome = session.apply_edge(EdgeEvent::falling(ms(600)), wall());

        assert_eq!(outcome, PulseOutcome::Accepted(ms(500)));
        assert_eq!(session.total_revolutions, 2);
        assert_eq!(session.last_interval, ms(500));
    }

    #[test]
    fn test_bounce_slides_window_only() {
        let mut session = Session::new(wall());
        session.apply_edge(EdgeEvent::falling(ms(100)), wall());
        session.apply_edge(EdgeEvent::falling(ms(600)), wall());

        let later_wall = wall() + chrono::Duration::seconds(1);
        let outcome = session.apply_edge(EdgeEvent::falling(ms(608)), later_wall);

        assert_eq!(outcome, PulseOutcome::Bounce(ms(8)));
        assert_eq!(session.total_revolutions, 2);
        assert_eq!(session.last_interval, ms(500));
        assert_eq!(session.last_timestamp, Some(ms(608)));
        assert_eq!(session.last_pulse_wall, Some(wall()));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut session = Session::new(wall());
        session.apply_edge(EdgeEvent::falling(ms(100)), wall());

        assert_eq!(
            session.apply_edge(EdgeEvent::falling(ms(110)), wall()),
            PulseOutcome::Bounce(ms(10))
        );
        let just_over = ms(110) + DEBOUNCE_THRESHOLD + Duration::from_nanos(1);
        assert!(matches!(
            session.apply_edge(EdgeEvent::falling(just_over), wall()),
            PulseOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_chained_bounces_measure_from_last_raw_edge() {
        let mut session = Session::new(wall());
        session.apply_edge(EdgeEvent::falling(ms(100)), wall());

        // Each edge is within 10ms of the one before, so none count even though
        // the last is 24ms after the accepted pulse.
        for t in [108, 116, 124] {
            assert!(matches!(
                session.apply_edge(EdgeEvent::falling(ms(t)), wall()),
                PulseOutcome::Bounce(_)
            ));
        }
        assert_eq!(session.total_revolutions, 1);
        assert_eq!(session.last_interval, Duration::ZERO);

        // Measured from 124, not from the accepted pulse at 100
        assert_eq!(
            session.apply_edge(EdgeEvent::falling(ms(140)), wall()),
            PulseOutcome::Accepted(ms(16))
        );
        assert_eq!(session.last_interval, ms(16));
    }

    #[test]
    fn test_out_of_order_timestamp_is_bounce() {
        let mut session = Session::new(wall());
        session.apply_edge(EdgeEvent::falling(ms(500)), wall());

        assert_eq!(
            session.apply_edge(EdgeEvent::falling(ms(200)), wall()),
            PulseOutcome::Bounce(Duration::ZERO)
        );
        assert_eq!(session.total_revolutions, 1);
        assert_eq!(session.last_timestamp, Some(ms(200)));
    }
}
