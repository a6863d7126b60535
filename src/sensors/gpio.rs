// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! GPIO character-device pulse source (Linux)

use std::path::PathBuf;
use std::time::Duration;
use async_trait::async_trait;
use gpiocdev::line::{Bias, EdgeDetection, EdgeKind as LineEdge, EventClock};
use gpiocdev::Request;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{EdgeEvent, EdgeKind, PulseSource, SourceStatus};
use crate::config::SensorConfig;
use crate::error::SensorError;

const CONSUMER: &str = "vital";

/// Longest the reader blocks before checking whether anyone is still listening
const WAIT_SLICE: Duration = Duration::from_millis(100);

type EdgeResult = Result<EdgeEvent, SensorError>;

/// Reed switch or hall sensor wired to one GPIO line.
///
/// The line is pulled up and edges are stamped with the kernel's monotonic
/// clock. A reader thread blocks on the line and forwards events through a
/// bounded channel so the async side never blocks.
pub struct GpioLineSource {
    id: String,
    chip_name: String,
    chip_path: PathBuf,
    line: u32,
    capacity: usize,
    status: SourceStatus,
    rx: Option<mpsc::Receiver<EdgeResult>>,
}

impl GpioLineSource {
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            id: format!("{}:{}", config.chip, config.line),
            chip_name: config.chip.clone(),
            chip_path: config.chip_path(),
            line: config.line,
            capacity: config.channel_capacity,
            status: SourceStatus::Disconnected,
            rx: None,
        }
    }

    fn acquire_error(&self, reason: impl ToString) -> SensorError {
        SensorError::Acquire {
            chip: self.chip_name.clone(),
            line: self.line,
            reason: reason.to_string(),
        }
    }
}

fn to_edge(event: &gpiocdev::line::EdgeEvent) -> EdgeEvent {
    let kind = match event.kind {
        LineEdge::Rising => EdgeKind::Rising,
        LineEdge::Falling => EdgeKind::Falling,
    };
    EdgeEvent {
        kind,
        timestamp: Duration::from_nanos(event.timestamp_ns),
    }
}

fn stream_error(e: gpiocdev::Error) -> SensorError {
    SensorError::Stream(e.to_string())
}

/// Forward edges into `tx` until the receiver is dropped or the line fails.
///
/// `wait` blocks for at most the given slice and reports whether an edge is
/// ready; `read` then takes it. An error is forwarded once and ends the loop.
fn forward_edges<W, R>(tx: &mpsc::Sender<EdgeResult>, mut wait: W, mut read: R)
where
    W: FnMut(Duration) -> Result<bool, SensorError>,
    R: FnMut() -> EdgeResult,
{
    while !tx.is_closed() {
        let item = match wait(WAIT_SLICE) {
            Ok(false) => continue,
            Ok(true) => read(),
            Err(e) => Err(e),
        };
        let failed = item.is_err();
        if tx.blocking_send(item).is_err() || failed {
            break;
        }
    }
}

#[async_trait]
impl PulseSource for GpioLineSource {
    fn id(&self) -> &str { &self.id }
    fn status(&self) -> SourceStatus { self.status }

    async fn connect(&mut self) -> Result<(), SensorError> {
        let request = Request::builder()
            .on_chip(self.chip_path.clone())
            .with_consumer(CONSUMER)
            .with_line(self.line)
            .as_input()
            .with_bias(Bias::PullUp)
            .with_edge_detection(EdgeDetection::BothEdges)
            .with_event_clock(EventClock::Monotonic)
            .request()
            .map_err(|e| self.acquire_error(e))?;

        let (tx, rx) = mpsc::channel(self.capacity);
        let id = self.id.clone();
        std::thread::Builder::new()
            .name(format!("gpio-{}", self.line))
            .spawn(move || {
                forward_edges(
                    &tx,
                    |slice| request.wait_edge_event(slice).map_err(stream_error),
                    || request.read_edge_event().map(|e| to_edge(&e)).map_err(stream_error),
                );
                // Dropping the request releases the line
                debug!("GPIO reader for {} exiting", id);
            })
            .map_err(|e| self.acquire_error(e))?;

        self.rx = Some(rx);
        self.status = SourceStatus::Connected;
        info!(
            "Requested pulled-up both-edge events on {} line {}",
            self.chip_path.display(),
            self.line
        );
        Ok(())
    }

    /// Drop the receiving end. The reader notices within one wait slice and
    /// releases the line, whether or not another edge arrives.
    async fn disconnect(&mut self) -> Result<(), SensorError> {
        self.rx = None;
        self.status = SourceStatus::Disconnected;
        Ok(())
    }

    async fn next_edge(&mut self) -> Result<Option<EdgeEvent>, SensorError> {
        let rx = self
            .rx
            .as_mut()
            .ok_or_else(|| SensorError::NotConnected(self.id.clone()))?;

        match rx.recv().await {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(e)) => {
                warn!("GPIO event stream on {} failed: {}", self.id, e);
                self.status = SourceStatus::Error;
                Err(e)
            }
            None => Ok(None),
        }
    }
}
