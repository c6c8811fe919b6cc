use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use tripline_core::{FlightOffer, HotelOffer};

/// Lookup failure. The flow surfaces exactly one user-facing error kind;
/// `Cancelled` marks a superseded lookup and is never shown to anyone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0}")]
    Failed(String),

    #[error("search cancelled")]
    Cancelled,
}

/// Asynchronous flight lookup. The mock implementation in this crate stands
/// in for a real booking API; the session is generic over the trait.
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search_flights(
        &self,
        destination: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FlightOffer>, SearchError>;
}

/// Asynchronous hotel lookup.
#[async_trait]
pub trait HotelSearch: Send + Sync {
    async fn search_hotels(
        &self,
        destination: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HotelOffer>, SearchError>;
}
