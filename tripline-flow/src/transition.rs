use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{BookingEvent, EventKind};
use crate::stage::Stage;
use crate::state::BookingState;

/// Apply one event to the booking state.
///
/// Pure and total: every `(state, event)` pair yields a new state, and events
/// that do not apply in the current stage return the state unchanged. All
/// side effects (the actual lookups) live with the session driver, which
/// observes the resulting stage.
pub fn apply(state: &BookingState, event: BookingEvent) -> BookingState {
    use BookingEvent::*;

    // Terminal stage: only a full reset gets out.
    if state.stage.is_terminal() && !matches!(event, Reset) {
        return state.clone();
    }

    match (&state.stage, event) {
        // A form edit merges everywhere the form is visible. From the flight
        // form and the error stage a complete merge auto-starts the lookup;
        // while a lookup is already outstanding it supersedes it, and an
        // incomplete merge abandons it.
        (Stage::FlightSearch | Stage::Failed { .. } | Stage::SearchingFlights, InputsUpdated { patch }) => {
            let was_searching = state.stage.is_searching();
            let mut next = state.clone();
            next.inputs.merge(patch);
            if next.inputs.is_complete() {
                begin_flight_search(&mut next);
            } else if was_searching {
                next.stage = Stage::FlightSearch;
            }
            next
        }
        (Stage::HotelSearch, InputsUpdated { patch }) => {
            let mut next = state.clone();
            next.inputs.merge(patch);
            next
        }

        (Stage::SearchingFlights, FlightSearchCompleted { offers }) => {
            let mut next = state.clone();
            next.flight_offers = offers;
            next.stage = Stage::FlightResults;
            next
        }
        (Stage::FlightResults, FlightSelected { flight_id }) => {
            if !state.flight_offers.iter().any(|o| o.id == flight_id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.selected_flight_id = Some(flight_id);
            next.stage = Stage::HotelSearch;
            next
        }

        (Stage::HotelSearch, HotelSearchRequested) => {
            let mut next = state.clone();
            begin_hotel_search(&mut next);
            next
        }
        (Stage::SearchingHotels, HotelSearchCompleted { offers }) => {
            let mut next = state.clone();
            next.hotel_offers = offers;
            next.stage = Stage::HotelResults;
            next
        }
        (Stage::HotelResults, HotelSelected { hotel_id }) => {
            if !state.hotel_offers.iter().any(|o| o.id == hotel_id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.selected_hotel_id = Some(hotel_id);
            next.stage = Stage::Review;
            next
        }

        (Stage::SearchingFlights | Stage::SearchingHotels, SearchFailed { message }) => {
            let mut next = state.clone();
            next.stage = Stage::Failed { message };
            next
        }

        (_, Back) => back(state),

        (Stage::Review, Confirm) => {
            let mut next = state.clone();
            next.stage = Stage::Confirmed;
            next
        }
        (Stage::Review, ChangeFlight) => {
            let mut next = state.clone();
            next.stage = Stage::FlightSearch;
            next
        }
        (Stage::Review, ChangeHotel) => {
            let mut next = state.clone();
            next.stage = Stage::HotelSearch;
            next
        }

        (_, Reset) => BookingState {
            search_seq: state.search_seq,
            ..BookingState::default()
        },

        _ => state.clone(),
    }
}

/// One stage backward along the fixed linear order; a no-op at the first
/// stage. Leaving a results stage backward discards its list (and with it
/// the selection made from that list).
fn back(state: &BookingState) -> BookingState {
    let mut next = state.clone();
    match state.stage {
        Stage::FlightSearch | Stage::Confirmed => return next,
        Stage::SearchingFlights | Stage::Failed { .. } => {
            next.stage = Stage::FlightSearch;
        }
        Stage::FlightResults => {
            next.flight_offers.clear();
            next.selected_flight_id = None;
            next.stage = Stage::FlightSearch;
        }
        Stage::HotelSearch => {
            next.stage = Stage::FlightResults;
        }
        Stage::SearchingHotels => {
            next.stage = Stage::HotelSearch;
        }
        Stage::HotelResults => {
            next.hotel_offers.clear();
            next.selected_hotel_id = None;
            next.stage = Stage::HotelSearch;
        }
        Stage::Review => {
            next.stage = Stage::HotelResults;
        }
    }
    next
}

fn begin_flight_search(state: &mut BookingState) {
    state.stage = Stage::SearchingFlights;
    state.search_seq += 1;
    state.flight_offers.clear();
    state.hotel_offers.clear();
    state.selected_flight_id = None;
    state.selected_hotel_id = None;
}

fn begin_hotel_search(state: &mut BookingState) {
    state.stage = Stage::SearchingHotels;
    state.search_seq += 1;
    state.hotel_offers.clear();
    state.selected_hotel_id = None;
}

/// One recorded transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    pub event: EventKind,
    /// Whether any part of the state changed, not just the stage.
    pub changed: bool,
}

/// Owns a [`BookingState`] and applies events to it, keeping a bounded
/// transition history.
#[derive(Debug, Clone)]
pub struct BookingMachine {
    state: BookingState,
    history: Vec<Transition>,
    max_history: usize,
}

impl Default for BookingMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingMachine {
    pub fn new() -> Self {
        Self::with_state(BookingState::new())
    }

    pub fn with_state(state: BookingState) -> Self {
        Self {
            state,
            history: Vec::new(),
            max_history: 50,
        }
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Apply an event and record the transition.
    pub fn handle_event(&mut self, event: BookingEvent) -> Transition {
        let kind = event.kind();
        let next = apply(&self.state, event);
        let changed = next != self.state;

        let transition = Transition {
            from: self.state.stage.clone(),
            to: next.stage.clone(),
            event: kind,
            changed,
        };
        debug!(
            from = transition.from.label(),
            to = transition.to.label(),
            event = ?transition.event,
            changed,
            "booking event applied"
        );

        self.state = next;
        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }

    /// Whether the event would change anything, without applying it.
    pub fn can_apply(&self, event: &BookingEvent) -> bool {
        apply(&self.state, event.clone()) != self.state
    }

    /// Replace the current state wholesale, e.g. from a restored snapshot.
    /// History is kept; the restore itself is not a transition.
    pub fn restore(&mut self, state: BookingState) {
        self.state = state;
    }
}
