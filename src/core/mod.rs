//! Core engine module - pulse counting, session state and stats

mod clock;
mod edge;
mod engine;
mod session;
mod stats;

pub use clock::{seconds_between, Clock, ManualClock, SystemClock};
pub use edge::PulseOutcome;
pub use engine::Engine;
pub use session::Session;
pub use stats::{kcal_per_minute, met_from_speed, round_to, Stats};
