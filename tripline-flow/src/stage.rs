use serde::{Deserialize, Serialize};

/// The single current phase of the booking flow.
///
/// The fixed linear order used by `Back` is
/// `FlightSearch → FlightResults → HotelSearch → HotelResults → Review →
/// Confirmed`. The searching stages and `Failed` sit off that line; backing
/// out of them returns to the nearest editing stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Editing the search form; the idle stage the flow starts in.
    FlightSearch,
    /// Flight lookup in flight.
    SearchingFlights,
    /// Flight offers listed, awaiting a selection.
    FlightResults,
    /// Editing the hotel fields, awaiting an explicit search request.
    HotelSearch,
    /// Hotel lookup in flight.
    SearchingHotels,
    /// Hotel offers listed, awaiting a selection.
    HotelResults,
    /// Both selections made, awaiting confirmation.
    Review,
    /// Terminal stage; no further transitions.
    Confirmed,
    /// The single error stage. The message is only representable here.
    Failed { message: String },
}

impl Default for Stage {
    fn default() -> Self {
        Stage::FlightSearch
    }
}

impl Stage {
    /// Terminal stages accept no event other than `Reset`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Confirmed)
    }

    /// Whether a lookup is outstanding in this stage.
    pub fn is_searching(&self) -> bool {
        matches!(self, Stage::SearchingFlights | Stage::SearchingHotels)
    }

    /// Short human-readable label for logs and progress display.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::FlightSearch => "flight search",
            Stage::SearchingFlights => "searching flights",
            Stage::FlightResults => "flight results",
            Stage::HotelSearch => "hotel search",
            Stage::SearchingHotels => "searching hotels",
            Stage::HotelResults => "hotel results",
            Stage::Review => "review",
            Stage::Confirmed => "confirmed",
            Stage::Failed { .. } => "failed",
        }
    }
}
