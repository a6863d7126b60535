//! Sensor module - pulse sources and the pump feeding the engine

mod manager;
mod simulator;
mod traits;

#[cfg(feature = "hardware")]
mod gpio;

pub use manager::{open_source, PulsePump, PumpReport};
pub use simulator::PulseSimulator;
pub use traits::{EdgeEvent, EdgeKind, PulseSource, SourceStatus};

#[cfg(feature = "hardware")]
pub use gpio::GpioLineSource;
