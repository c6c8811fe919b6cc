pub mod adapter;
pub mod mock;
pub mod policy;

pub use adapter::{FlightSearch, HotelSearch, SearchError};
pub use mock::{MockFlightSearch, MockHotelSearch};
pub use policy::{cheapest_flight, top_rated_hotel};
