// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Error types shared across the crate

use thiserror::Error;

/// Failures raised by pulse sources
#[derive(Error, Debug)]
pub enum SensorError {
    /// The GPIO chip or line could not be requested
    #[error("failed to acquire line {line} on {chip}: {reason}")]
    Acquire {
        chip: String,
        line: u32,
        reason: String,
    },

    /// The event stream broke after the line was acquired
    #[error("edge event stream failed: {0}")]
    Stream(String),

    /// `next_edge` was called before `connect`
    #[error("pulse source '{0}' is not connected")]
    NotConnected(String),

    /// Built without the `hardware` feature and not in demo mode
    #[error("GPIO support not enabled. Rebuild with --features hardware or run with --demo")]
    HardwareUnavailable,
}

/// Semantic configuration problems caught by `Config::validate`
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("sensor.channel_capacity must be at least 1")]
    ZeroCapacity,

    #[error("sensor.chip must not be empty")]
    EmptyChip,
}
