pub mod booking;
pub mod itinerary;

pub use booking::{BookingHandle, BookingStore};
pub use itinerary::{Destination, ItineraryError, ItineraryStore, TodoItem};
