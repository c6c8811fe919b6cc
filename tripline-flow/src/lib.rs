//! Booking flow state machine.
//!
//! The machine is deliberately split the same way the rest of the workspace
//! is: `stage` and `event` define the vocabulary, `state` the data that rides
//! along, and `transition` the pure function that ties them together.

pub mod event;
pub mod stage;
pub mod state;
pub mod transition;

pub use event::{BookingEvent, EventKind};
pub use stage::Stage;
pub use state::BookingState;
pub use transition::{apply, BookingMachine, Transition};
