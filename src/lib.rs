// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! vital - live cycling telemetry from a wheel rotation sensor
//!
//! A reed switch or hall sensor on the wheel pulls a GPIO line low once per
//! rotation. vital debounces those edges, counts revolutions and turns them
//! into speed, distance, moving time and calories on request.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   EdgeEvent    ┌────────────┐  on_edge   ┌──────────────────┐
//! │ PulseSource  │ ─────────────→ │ PulsePump  │ ─────────→ │      Engine      │
//! │ gpio / sim   │  (bounded ch.) └────────────┘            │ ┌──────────────┐ │
//! └──────────────┘                                          │ │ Mutex<       │ │
//!                                                           │ │   Session>   │ │
//! ┌──────────────┐  GET /api/v1/stats   snapshot            │ └──────────────┘ │
//! │  HttpServer  │ ───────────────────────────────────────→ │  Arc<Config>     │
//! │    (axum)    │  POST /api/v1/reset  reset               │  Arc<dyn Clock>  │
//! └──────────────┘ ───────────────────────────────────────→ └──────────────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod error;
pub mod sensors;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::{Engine, Stats};
pub use error::{ConfigError, SensorError};
pub use sensors::{EdgeEvent, EdgeKind, PulsePump, PulseSource};
pub use server::{ApiResponse, HttpServer};

/// vital version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// vital name
pub const NAME: &str = "vital";
