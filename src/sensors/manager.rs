// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Pulse pump - connects a source and drives the engine from it

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::{PulseSimulator, PulseSource};
use crate::config::Config;
use crate::core::Engine;
use crate::error::SensorError;

/// Pick the pulse source for this configuration
pub fn open_source(config: &Config) -> Result<Box<dyn PulseSource>, SensorError> {
    if config.sensor.demo_mode {
        info!("Using simulated pulse source");
        return Ok(Box::new(PulseSimulator::new(
            "simulator",
            config.rider.circumference_metres,
        )));
    }

    #[cfg(feature = "hardware")]
    {
        Ok(Box::new(super::GpioLineSource::new(&config.sensor)))
    }

    #[cfg(not(feature = "hardware"))]
    {
        Err(SensorError::HardwareUnavailable)
    }
}

/// Totals from a finished pump run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub events: u64,
    pub falling_edges: u64,
}

/// Feeds edges from one source into the engine, in arrival order
pub struct PulsePump {
    source: Box<dyn PulseSource>,
    engine: Arc<Engine>,
    report: PumpReport,
}

impl PulsePump {
    /// Connect the source. Failing here means the process must not start serving.
    pub async fn connect(
        mut source: Box<dyn PulseSource>,
        engine: Arc<Engine>,
    ) -> Result<Self, SensorError> {
        source.connect().await?;
        info!("Connected pulse source: {}", source.id());

        Ok(Self {
            source,
            engine,
            report: PumpReport::default(),
        })
    }

    /// Run until the source ends, fails, or shutdown is signalled
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<PumpReport, SensorError> {
        let outcome = loop {
            tokio::select! {
                next = self.source.next_edge() => {
                    match next {
                        Ok(Some(event)) => {
                            self.report.events += 1;
                            if event.is_falling() {
                                self.report.falling_edges += 1;
                            }
                            self.engine.on_edge(event);
                        }
                        Ok(None) => {
                            info!("Pulse source {} has no more events", self.source.id());
                            break Ok(());
                        }
                        Err(e) => {
                            error!("Pulse source {} failed: {}", self.source.id(), e);
                            break Err(e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Pulse pump shutting down...");
                    break Ok(());
                }
            }
        };

        if let Err(e) = self.source.disconnect().await {
            warn!("Error disconnecting {}: {}", self.source.id(), e);
        }

        info!(
            "Pulse pump stopped after {} events ({} falling)",
            self.report.events, self.report.falling_edges
        );
        outcome.map(|_| self.report)
    }
}
