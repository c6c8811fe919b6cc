use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::debug;

use tripline_core::{FlightOffer, HotelOffer};

use crate::adapter::{FlightSearch, HotelSearch, SearchError};

const FLIGHT_FAILURE: &str = "Failed to search flights";
const HOTEL_FAILURE: &str = "Failed to search hotels";

/// Timer-based flight lookup over a canned catalog.
///
/// Latency defaults to one second; tests shrink it. `fail_next_requests`
/// makes the next N lookups fail with the collapsed user-facing message.
pub struct MockFlightSearch {
    catalog: Vec<FlightOffer>,
    latency: Duration,
    jitter: Duration,
    fail_next: AtomicUsize,
}

impl Default for MockFlightSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFlightSearch {
    pub fn new() -> Self {
        Self {
            catalog: vec![
                FlightOffer::new("Sky Airways", 299, "2h 30m"),
                FlightOffer::new("Ocean Air", 349, "2h 45m"),
                FlightOffer::new("Mountain Express", 279, "3h 15m"),
            ],
            latency: Duration::from_millis(1000),
            jitter: Duration::ZERO,
            fail_next: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<FlightOffer>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &[FlightOffer] {
        &self.catalog
    }

    /// Make the next `count` lookups fail.
    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl FlightSearch for MockFlightSearch {
    async fn search_flights(
        &self,
        destination: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<FlightOffer>, SearchError> {
        sleep(simulated_delay(self.latency, self.jitter)).await;

        if self.take_failure() {
            return Err(SearchError::Failed(FLIGHT_FAILURE.to_string()));
        }

        debug!(destination, offers = self.catalog.len(), "mock flight search completed");
        Ok(self.catalog.clone())
    }
}

/// Timer-based hotel lookup over a canned catalog.
pub struct MockHotelSearch {
    catalog: Vec<HotelOffer>,
    latency: Duration,
    jitter: Duration,
    fail_next: AtomicUsize,
}

impl Default for MockHotelSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHotelSearch {
    pub fn new() -> Self {
        Self {
            catalog: vec![
                HotelOffer::new("Grand Hotel", 199, 4.5)
                    .with_amenities(&["Pool", "Spa", "Restaurant"]),
                HotelOffer::new("Seaside Resort", 249, 4.8)
                    .with_amenities(&["Beach Access", "Pool", "Bar"]),
                HotelOffer::new("City Center Hotel", 179, 4.2)
                    .with_amenities(&["Gym", "Restaurant", "Business Center"]),
            ],
            latency: Duration::from_millis(1500),
            jitter: Duration::ZERO,
            fail_next: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<HotelOffer>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &[HotelOffer] {
        &self.catalog
    }

    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl HotelSearch for MockHotelSearch {
    async fn search_hotels(
        &self,
        destination: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<HotelOffer>, SearchError> {
        sleep(simulated_delay(self.latency, self.jitter)).await;

        if self.take_failure() {
            return Err(SearchError::Failed(HOTEL_FAILURE.to_string()));
        }

        debug!(destination, offers = self.catalog.len(), "mock hotel search completed");
        Ok(self.catalog.clone())
    }
}

fn simulated_delay(latency: Duration, jitter: Duration) -> Duration {
    let jitter_ms = jitter.as_millis() as u64;
    if jitter_ms == 0 {
        return latency;
    }
    latency + Duration::from_millis(rand::random::<u64>() % jitter_ms)
}
