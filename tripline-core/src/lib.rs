pub mod inputs;
pub mod offers;

pub use inputs::{InputPatch, RoomType, SearchInputs};
pub use offers::{FlightOffer, HotelOffer};
