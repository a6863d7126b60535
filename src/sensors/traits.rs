// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Pulse source traits and common types

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SensorError;

/// Direction of a line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Rising,
    Falling,  // one per wheel rotation
}

/// A single edge reported by a pulse source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEvent {
    pub kind: EdgeKind,
    /// Monotonic timestamp, measured from an arbitrary origin
    pub timestamp: Duration,
}

impl EdgeEvent {
    pub fn falling(timestamp: Duration) -> Self {
        Self { kind: EdgeKind::Falling, timestamp }
    }

    pub fn rising(timestamp: Duration) -> Self {
        Self { kind: EdgeKind::Rising, timestamp }
    }

    pub fn is_falling(&self) -> bool {
        self.kind == EdgeKind::Falling
    }
}

/// Source operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceStatus {
    Disconnected,
    Connected,
    Error,
}

/// Anything that can deliver wheel edges
#[async_trait]
pub trait PulseSource: Send {
    /// Get source identifier
    fn id(&self) -> &str;

    /// Get current status
    fn status(&self) -> SourceStatus;

    /// Acquire the underlying line
    async fn connect(&mut self) -> Result<(), SensorError>;

    /// Release the underlying line
    async fn disconnect(&mut self) -> Result<(), SensorError>;

    /// Wait for the next edge. `Ok(None)` means the source has no more events.
    async fn next_edge(&mut self) -> Result<Option<EdgeEvent>, SensorError>;
}
