//! Session wiring: a booking store, the search adapters, and the effect
//! driver that turns stage transitions into lookups.

pub mod config;
pub mod driver;
pub mod telemetry;

pub use config::{FlowOptions, SearchTimings, SessionConfig};
pub use driver::TripSession;
