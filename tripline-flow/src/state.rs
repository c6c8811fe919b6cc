use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripline_core::{FlightOffer, HotelOffer, SearchInputs};

use crate::stage::Stage;

/// The complete observable state of one booking flow instance.
///
/// Result lists are produced fresh per search, retained while the user moves
/// forward (so `Back` lands on a populated results stage) and discarded when
/// a new search starts or `Back` leaves the corresponding results stage.
/// When set, each selected id always refers to an entry of the matching
/// offer list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingState {
    pub stage: Stage,
    pub inputs: SearchInputs,
    pub flight_offers: Vec<FlightOffer>,
    pub hotel_offers: Vec<HotelOffer>,
    pub selected_flight_id: Option<Uuid>,
    pub selected_hotel_id: Option<Uuid>,
    /// Bumped every time a lookup is (re)started. Lets the session driver
    /// recognise a completion that belongs to a superseded lookup. Survives
    /// `Reset` so the counter stays monotonic for the life of the instance.
    pub search_seq: u64,
}

impl BookingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_flight(&self) -> Option<&FlightOffer> {
        self.selected_flight_id
            .and_then(|id| self.flight_offers.iter().find(|o| o.id == id))
    }

    pub fn selected_hotel(&self) -> Option<&HotelOffer> {
        self.selected_hotel_id
            .and_then(|id| self.hotel_offers.iter().find(|o| o.id == id))
    }

    /// Flight price times passenger count, for the booking summary.
    pub fn flight_total(&self) -> Option<i64> {
        self.selected_flight()
            .map(|f| f.price_amount as i64 * self.inputs.passengers as i64)
    }

    /// Combined price of whatever has been selected so far, for the review
    /// screen. Unselected parts count as zero.
    pub fn trip_total(&self) -> i64 {
        let flight = self.selected_flight().map_or(0, |f| f.price_amount as i64);
        let hotel = self.selected_hotel().map_or(0, |h| h.price_amount as i64);
        flight + hotel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = BookingState::new();
        assert_eq!(state.stage, Stage::FlightSearch);
        assert!(state.flight_offers.is_empty());
        assert!(state.selected_flight_id.is_none());
        assert_eq!(state.search_seq, 0);
    }

    #[test]
    fn test_totals_follow_selections() {
        let flight = FlightOffer::new("Sky Airways", 299, "2h 30m");
        let hotel = HotelOffer::new("Grand Hotel", 199, 4.5);

        let mut state = BookingState::new();
        state.inputs.passengers = 2;
        state.selected_flight_id = Some(flight.id);
        state.selected_hotel_id = Some(hotel.id);
        state.flight_offers = vec![flight];
        state.hotel_offers = vec![hotel];

        assert_eq!(state.flight_total(), Some(598));
        assert_eq!(state.trip_total(), 299 + 199);
    }

    #[test]
    fn test_selection_outside_offer_list_resolves_to_none() {
        let mut state = BookingState::new();
        state.selected_flight_id = Some(Uuid::new_v4());
        assert!(state.selected_flight().is_none());
        assert_eq!(state.flight_total(), None);
    }
}
