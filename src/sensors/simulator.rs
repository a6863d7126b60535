// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Pulse simulator for demo/testing

use std::collections::VecDeque;
use std::time::Duration;
use async_trait::async_trait;
use rand::prelude::*;
use rand_distr::Normal;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::{EdgeEvent, PulseSource, SourceStatus};
use crate::error::SensorError;

/// Simulates a reed switch on a wheel being ridden
pub struct PulseSimulator {
    id: String,
    status: SourceStatus,
    rng: StdRng,
    circumference_metres: f64,

    // Simulation state
    speed_kmh: f64,
    jitter: f64,
    bounce_probability: f64,
    stop_probability: f64,
    origin: Option<Instant>,
    cursor: Duration,
    pending: VecDeque<EdgeEvent>,
    rotations: u64,
    max_rotations: Option<u64>,
}

impl PulseSimulator {
    pub fn new(id: &str, circumference_metres: f64) -> Self {
        Self::with_rng(id, circumference_metres, StdRng::from_entropy())
    }

    /// Deterministic simulator for tests
    pub fn seeded(id: &str, circumference_metres: f64, seed: u64) -> Self {
        Self::with_rng(id, circumference_metres, StdRng::seed_from_u64(seed))
    }

    fn with_rng(id: &str, circumference_metres: f64, rng: StdRng) -> Self {
        Self {
            id: id.to_string(),
            status: SourceStatus::Disconnected,
            rng,
            circumference_metres,
            speed_kmh: 22.0,
            jitter: 0.03,
            bounce_probability: 0.05,
            stop_probability: 0.002,
            origin: None,
            cursor: Duration::ZERO,
            pending: VecDeque::new(),
            rotations: 0,
            max_rotations: None,
        }
    }

    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    pub fn with_bounce_probability(mut self, probability: f64) -> Self {
        self.bounce_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_stop_probability(mut self, probability: f64) -> Self {
        self.stop_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// End the stream after this many rotations
    pub fn with_max_rotations(mut self, rotations: u64) -> Self {
        self.max_rotations = Some(rotations);
        self
    }

    fn schedule_rotation(&mut self) {
        // Slow wander in speed, kept to a plausible range
        self.speed_kmh = (self.speed_kmh + self.rng.gen_range(-0.5..0.5)).clamp(6.0, 45.0);

        let factor = Normal::new(1.0, self.jitter)
            .map(|n| n.sample(&mut self.rng))
            .unwrap_or(1.0)
            .clamp(0.5, 1.5);
        let metres_per_second = self.speed_kmh / 3.6;
        let mut period = Duration::from_secs_f64(self.circumference_metres / metres_per_second * factor);

        if self.rng.gen_bool(self.stop_probability) {
            let pause = Duration::from_secs_f64(self.rng.gen_range(3.0..15.0));
            debug!("Simulator {} pausing for {:?}", self.id, pause);
            period += pause;
        }

        let rise = self.cursor + period / 2;
        let fall = self.cursor + period;
        self.pending.push_back(EdgeEvent::rising(rise));
        self.pending.push_back(EdgeEvent::falling(fall));

        if self.rng.gen_bool(self.bounce_probability) {
            let chatter = Duration::from_micros(self.rng.gen_range(1_000..5_000));
            self.pending.push_back(EdgeEvent::rising(fall + chatter / 2));
            self.pending.push_back(EdgeEvent::falling(fall + chatter));
        }

        self.cursor = fall;
        self.rotations += 1;
    }
}

#[async_trait]
impl PulseSource for PulseSimulator {
    fn id(&self) -> &str { &self.id }
    fn status(&self) -> SourceStatus { self.status }

    async fn connect(&mut self) -> Result<(), SensorError> {
        self.origin = Some(Instant::now());
        self.status = SourceStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), SensorError> {
        self.status = SourceStatus::Disconnected;
        self.pending.clear();
        Ok(())
    }

    async fn next_edge(&mut self) -> Result<Option<EdgeEvent>, SensorError> {
        let origin = match (self.status, self.origin) {
            (SourceStatus::Connected, Some(origin)) => origin,
            _ => return Err(SensorError::NotConnected(self.id.clone())),
        };

        if self.pending.is_empty() {
            if self.max_rotations.is_some_and(|max| self.rotations >= max) {
                return Ok(None);
            }
            self.schedule_rotation();
        }

        let Some(&event) = self.pending.front() else {
            return Ok(None);
        };
        // Popped only after the sleep so a cancelled wait loses nothing
        sleep_until(origin + event.timestamp).await;
        self.pending.pop_front();
        Ok(Some(event))
    }
}
