// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Snapshot calculation - speed, distance, calories and moving time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::seconds_between;
use super::Session;
use crate::config::RiderConfig;

/// Nanoseconds per hour over metres per kilometre, turns m/ns into km/h
const KMH_FACTOR: f64 = 3.6e9;

/// Oxygen uptake per MET, ml/kg/min
const MET_OXYGEN_ML: f64 = 3.5;

/// Reported telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub speed_kilometres_per_hour: f64,
    pub total_revolutions: u64,
    pub distance_kilometres: f64,
    pub start_time_epoch_seconds: i64,
    pub moving_minutes: f64,
    pub kilo_calories: f64,
}

/// Metabolic equivalent for a cycling speed in km/h
pub fn met_from_speed(speed_kmh: f64) -> f64 {
    match speed_kmh {
        s if s < 10.0 => 3.5,
        s if s < 16.0 => 5.5,
        s if s < 20.0 => 7.0,
        s if s < 24.0 => 8.0,
        s if s < 28.0 => 10.0,
        _ => 12.0,
    }
}

/// Energy burn rate for a MET value and body weight
pub fn kcal_per_minute(met: f64, body_weight_kg: f64) -> f64 {
    met * MET_OXYGEN_ML * body_weight_kg / 200.0
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl Session {
    /// Instantaneous speed implied by the latest interval, zero before it exists
    pub fn speed_kmh(&self, circumference_metres: f64) -> f64 {
        if !self.has_interval() {
            return 0.0;
        }
        circumference_metres * KMH_FACTOR / self.last_interval.as_nanos() as f64
    }

    pub fn distance_km(&self, circumference_metres: f64) -> f64 {
        self.total_revolutions as f64 * circumference_metres / 1000.0
    }

    /// Whether the last accepted pulse is younger than the idle timeout
    pub fn is_moving(&self, now: DateTime<Utc>, idle_timeout_seconds: f64) -> bool {
        self.last_pulse_wall
            .map(|last| seconds_between(last, now) < idle_timeout_seconds)
            .unwrap_or(false)
    }

    /// Advance the accumulators to `now` and report.
    ///
    /// Not a pure read: the time since the previous call is credited to
    /// moving time and calories when the rider is moving, and dropped
    /// otherwise. Calling twice at the same instant credits nothing the
    /// second time.
    pub fn integrate(&mut self, rider: &RiderConfig, now: DateTime<Utc>) -> Stats {
        let dt_wall = self
            .last_calc_wall
            .map(|last| seconds_between(last, now))
            .unwrap_or(0.0);
        self.last_calc_wall = Some(now);

        let distance_km = self.distance_km(rider.circumference_metres);
        let speed_kmh = self.speed_kmh(rider.circumference_metres);
        let moving = self.is_moving(now, rider.idle_timeout_seconds);

        if moving && dt_wall > 0.0 {
            let met = met_from_speed(speed_kmh);
            let rate = kcal_per_minute(met, rider.body_weight_kilograms);
            self.kilo_calories += rate * (dt_wall / 60.0);
            self.moving_seconds += dt_wall;
        }

        Stats {
            speed_kilometres_per_hour: round_to(speed_kmh, 2),
            total_revolutions: self.total_revolutions,
            distance_kilometres: round_to(distance_km, 3),
            start_time_epoch_seconds: self.start_time_epoch_seconds,
            moving_minutes: round_to(self.moving_seconds / 60.0, 2),
            kilo_calories: round_to(self.kilo_calories, 1),
        }
    }
}
