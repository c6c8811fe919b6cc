use tripline_core::{FlightOffer, HotelOffer};

/// Pick the minimum-price flight. Ties resolve to the first occurrence
/// (stable reduction), so repeated runs over the same list agree.
pub fn cheapest_flight(offers: &[FlightOffer]) -> Option<&FlightOffer> {
    offers
        .iter()
        .reduce(|best, offer| if offer.price_amount < best.price_amount { offer } else { best })
}

/// Pick the maximum-rating hotel. Ties resolve to the first occurrence.
pub fn top_rated_hotel(offers: &[HotelOffer]) -> Option<&HotelOffer> {
    offers
        .iter()
        .reduce(|best, offer| if offer.rating > best.rating { offer } else { best })
}
