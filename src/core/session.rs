// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Riding session state

use std::time::Duration;
use chrono::{DateTime, Utc};

/// Counters and accumulators for one riding session.
///
/// Only [`Engine`](super::Engine) owns a live session; the copies handed out
/// by [`Engine::session`](super::Engine::session) are inspection snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Accepted pulses since the session started
    pub total_revolutions: u64,
    pub start_time_epoch_seconds: i64,

    /// Last raw falling edge, accepted or debounced. Debounce reference.
    pub last_timestamp: Option<Duration>,
    /// Gap between the two most recent accepted pulses, zero until the second
    pub last_interval: Duration,

    /// Wall time of the last accepted pulse, for idle detection
    pub last_pulse_wall: Option<DateTime<Utc>>,
    /// Wall time of the previous snapshot
    pub last_calc_wall: Option<DateTime<Utc>>,
    pub moving_seconds: f64,
    pub kilo_calories: f64,
}

impl Session {
    pub fn new(started: DateTime<Utc>) -> Self {
        Self {
            total_revolutions: 0,
            start_time_epoch_seconds: started.timestamp(),
            last_timestamp: None,
            last_interval: Duration::ZERO,
            last_pulse_wall: None,
            last_calc_wall: None,
            moving_seconds: 0.0,
            kilo_calories: 0.0,
        }
    }

    /// Whether an inter-pulse interval is available for speed
    pub fn has_interval(&self) -> bool {
        !self.last_interval.is_zero()
    }
}
