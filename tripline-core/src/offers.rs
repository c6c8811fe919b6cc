use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flight option returned by a search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOffer {
    pub id: Uuid,
    pub airline: String,
    pub price_amount: i32,
    pub price_currency: String,
    pub duration: String,
}

impl FlightOffer {
    pub fn new(airline: impl Into<String>, price_amount: i32, duration: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            airline: airline.into(),
            price_amount,
            price_currency: "USD".to_string(),
            duration: duration.into(),
        }
    }
}

/// A hotel option returned by a search. Price is per night.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelOffer {
    pub id: Uuid,
    pub name: String,
    pub price_amount: i32,
    pub price_currency: String,
    pub rating: f64,
    pub amenities: Vec<String>,
}

impl HotelOffer {
    pub fn new(name: impl Into<String>, price_amount: i32, rating: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price_amount,
            price_currency: "USD".to_string(),
            rating,
            amenities: Vec::new(),
        }
    }

    pub fn with_amenities(mut self, amenities: &[&str]) -> Self {
        self.amenities = amenities.iter().map(|a| a.to_string()).collect();
        self
    }
}
