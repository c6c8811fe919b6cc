use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripline_core::{FlightOffer, HotelOffer, InputPatch};

/// Events that drive the booking flow.
///
/// User actions and adapter completions share one vocabulary; the transition
/// function decides which apply in the current stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingEvent {
    /// A form edit. Merging a patch that completes the inputs is the only
    /// auto-triggered transition in the flow.
    InputsUpdated { patch: InputPatch },

    /// The flight lookup returned a fresh result list.
    FlightSearchCompleted { offers: Vec<FlightOffer> },

    /// The user picked a flight from the current result list.
    FlightSelected { flight_id: Uuid },

    /// The user asked for the hotel lookup to run.
    HotelSearchRequested,

    /// The hotel lookup returned a fresh result list.
    HotelSearchCompleted { offers: Vec<HotelOffer> },

    /// The user picked a hotel from the current result list.
    HotelSelected { hotel_id: Uuid },

    /// Either lookup failed. Any underlying cause collapses to one message.
    SearchFailed { message: String },

    /// One stage backward along the fixed linear order.
    Back,

    /// Confirm the booking; only valid from `Review`.
    Confirm,

    /// Jump from `Review` back to the flight form.
    ChangeFlight,

    /// Jump from `Review` back to the hotel form.
    ChangeHotel,

    /// Discard everything and return to the initial state.
    Reset,
}

/// Payload-free discriminant of a [`BookingEvent`], kept in transition
/// records so history stays cheap to store and easy to assert on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    InputsUpdated,
    FlightSearchCompleted,
    FlightSelected,
    HotelSearchRequested,
    HotelSearchCompleted,
    HotelSelected,
    SearchFailed,
    Back,
    Confirm,
    ChangeFlight,
    ChangeHotel,
    Reset,
}

impl BookingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BookingEvent::InputsUpdated { .. } => EventKind::InputsUpdated,
            BookingEvent::FlightSearchCompleted { .. } => EventKind::FlightSearchCompleted,
            BookingEvent::FlightSelected { .. } => EventKind::FlightSelected,
            BookingEvent::HotelSearchRequested => EventKind::HotelSearchRequested,
            BookingEvent::HotelSearchCompleted { .. } => EventKind::HotelSearchCompleted,
            BookingEvent::HotelSelected { .. } => EventKind::HotelSelected,
            BookingEvent::SearchFailed { .. } => EventKind::SearchFailed,
            BookingEvent::Back => EventKind::Back,
            BookingEvent::Confirm => EventKind::Confirm,
            BookingEvent::ChangeFlight => EventKind::ChangeFlight,
            BookingEvent::ChangeHotel => EventKind::ChangeHotel,
            BookingEvent::Reset => EventKind::Reset,
        }
    }

    /// Whether the event originates from the user rather than a lookup.
    pub fn is_user_event(&self) -> bool {
        !matches!(
            self,
            BookingEvent::FlightSearchCompleted { .. }
                | BookingEvent::HotelSearchCompleted { .. }
                | BookingEvent::SearchFailed { .. }
        )
    }
}
