//! Telemetry engine - owns the session and serializes every access to it

use std::sync::Arc;
use parking_lot::Mutex;
use tracing::{info, trace};

use crate::config::Config;
use crate::sensors::EdgeEvent;
use super::clock::{Clock, SystemClock};
use super::edge::PulseOutcome;
use super::{Session, Stats};

/// The live telemetry engine.
///
/// Pulses, snapshots and resets all go through one mutex. A snapshot
/// mutates the accumulators, so there is no read-only path. The clock is
/// read inside the critical section so concurrent pollers integrate over
/// strictly ordered instants.
pub struct Engine {
    config: Arc<Config>,
    session: Mutex<Session>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Arc<Config>, clock: Arc<dyn Clock>) -> Self {
        let session = Session::new(clock.now());
        Self {
            config,
            session: Mutex::new(session),
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Feed one edge from the pulse source
    pub fn on_edge(&self, event: EdgeEvent) {
        if !event.is_falling() {
            return;
        }

        let (outcome, total) = {
            let mut session = self.session.lock();
            let outcome = session.apply_edge(event, self.clock.now());
            (outcome, session.total_revolutions)
        };

        // Logged outside the lock
        match outcome {
            PulseOutcome::Bounce(dt) => trace!(?dt, "debounced edge"),
            PulseOutcome::Accepted(dt) => trace!(?dt, total, "pulse"),
            PulseOutcome::First => trace!("first pulse of session"),
            PulseOutcome::Ignored => {}
        }
    }

    /// Integrate time since the previous call and report current stats
    pub fn snapshot(&self) -> Stats {
        let stats = {
            let mut session = self.session.lock();
            let now = self.clock.now();
            session.integrate(&self.config.rider, now)
        };
        trace!(?stats, "snapshot");
        stats
    }

    /// Start a fresh session. Configuration is kept.
    pub fn reset(&self) {
        {
            let mut session = self.session.lock();
            *session = Session::new(self.clock.now());
        }
        info!("Session reset");
    }

    /// Copy of the current session state
    pub fn session(&self) -> Session {
        self.session.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn engine() -> (Engine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
        ));
        let engine = Engine::with_clock(Arc::new(Config::default()), clock.clone());
        (engine, clock)
    }

    /// Steady pedalling: one falling edge every `gap_ms`, with the wall clock
    /// advancing in step and a snapshot after each pulse.
    fn ride(engine: &Engine, clock: &ManualClock, from_ms: u64, gap_ms: u64, pulses: u64) -> u64 {
        let mut t = from_ms;
        for _ in 0..pulses {
            t += gap_ms;
            clock.advance_millis(gap_ms as i64);
            engine.on_edge(EdgeEvent::falling(Duration::from_millis(t)));
            engine.snapshot();
        }
        t
    }

    #[test]
    fn test_one_minute_slow_ride() {
        let (engine, clock) = engine();
        engine.on_edge(EdgeEvent::falling(Duration::from_millis(0)));
        engine.snapshot();

        // 1000ms gaps at 1.41m is ~5 km/h, the 3.5 MET tier
        ride(&engine, &clock, 0, 1000, 60);

        let stats = engine.snapshot();
        assert_eq!(stats.total_revolutions, 61);
        assert_eq!(stats.speed_kilometres_per_hour, 5.08);
        assert_eq!(stats.moving_minutes, 1.0);
        assert_eq!(stats.kilo_calories, 5.2);
    }

    #[test]
    fn test_rapid_polling_does_not_double_count() {
        let (engine, clock) = engine();
        engine.on_edge(EdgeEvent::falling(Duration::from_millis(0)));
        engine.snapshot();
        clock.advance_millis(500);

        engine.snapshot();
        let first = engine.session();
        engine.snapshot();
        let second = engine.session();

        assert_eq!(first.moving_seconds, 0.5);
        assert_eq!(first.moving_seconds, second.moving_seconds);
        assert_eq!(first.kilo_calories, second.kilo_calories);
    }

    #[test]
    fn test_idle_freezes_accumulators_until_next_pulse() {
        let (engine, clock) = engine();
        engine.on_edge(EdgeEvent::falling(Duration::from_millis(0)));
        engine.snapshot();
        let t = ride(&engine, &clock, 0, 500, 4);
        let before = engine.snapshot();

        clock.advance_millis(2_000);
        let idle_a = engine.snapshot();
        clock.advance_millis(30_000);
        let idle_b = engine.snapshot();

        assert_eq!(before.moving_minutes, idle_a.moving_minutes);
        assert_eq!(idle_a.moving_minutes, idle_b.moving_minutes);
        assert_eq!(idle_a.kilo_calories, idle_b.kilo_calories);
        // Held, not decayed
        assert_eq!(idle_b.speed_kilometres_per_hour, before.speed_kilometres_per_hour);

        engine.on_edge(EdgeEvent::falling(Duration::from_millis(t + 32_500)));
        clock.advance_millis(1_000);
        let resumed = engine.snapshot();
        assert!(resumed.moving_minutes > idle_b.moving_minutes);
    }

    #[test]
    fn test_speed_changes_only_with_new_pulses() {
        let (engine, clock) = engine();
        engine.on_edge(EdgeEvent::falling(Duration::from_millis(1_000)));
        engine.on_edge(EdgeEvent::falling(Duration::from_millis(1_500)));
        assert_eq!(engine.snapshot().speed_kilometres_per_hour, 10.15);

        clock.advance_millis(250);
        assert_eq!(engine.snapshot().speed_kilometres_per_hour, 10.15);

        engine.on_edge(EdgeEvent::falling(Duration::from_millis(1_750)));
        assert_eq!(engine.snapshot().speed_kilometres_per_hour, 20.3);
    }

    #[test]
    fn test_reset_starts_fresh_session() {
        let (engine, clock) = engine();
        engine.on_edge(EdgeEvent::falling(Duration::from_millis(0)));
        engine.snapshot();
        ride(&engine, &clock, 0, 400, 10);
        let before = engine.snapshot();
        assert!(before.kilo_calories > 0.0);

        clock.advance_millis(90_000);
        engine.reset();
        let after = engine.snapshot();

        assert_eq!(after.total_revolutions, 0);
        assert_eq!(after.moving_minutes, 0.0);
        assert_eq!(after.kilo_calories, 0.0);
        assert_eq!(after.speed_kilometres_per_hour, 0.0);
        assert_eq!(after.start_time_epoch_seconds, before.start_time_epoch_seconds + 94);
        assert_eq!(engine.session().last_timestamp, None);
        assert_eq!(engine.config().rider.circumference_metres, 1.41);
    }

    #[test]
    fn test_rising_edges_do_not_touch_session() {
        let (engine, _clock) = engine();
        let before = engine.session();
        engine.on_edge(EdgeEvent::rising(Duration::from_millis(100)));
        assert_eq!(engine.session(), before);
    }
}
