use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, info, warn};

use tripline_flow::{BookingEvent, BookingState, Stage};
use tripline_search::{
    cheapest_flight, top_rated_hotel, FlightSearch, HotelSearch, MockFlightSearch,
    MockHotelSearch, SearchError,
};
use tripline_store::{BookingHandle, BookingStore};

use crate::config::SessionConfig;

/// One booking page instance: an owned store plus the effect driver that
/// watches stage transitions and runs the lookups.
///
/// At most one lookup is in flight at a time. Re-entering a searching stage
/// bumps the state's `search_seq`, which both aborts the outstanding lookup
/// task and (through the store's sequence check) drops any result it might
/// still deliver.
pub struct TripSession {
    store: Arc<BookingStore>,
    driver: JoinHandle<()>,
}

impl TripSession {
    pub fn start(
        config: &SessionConfig,
        flights: Arc<dyn FlightSearch>,
        hotels: Arc<dyn HotelSearch>,
    ) -> Self {
        let store = Arc::new(BookingStore::new());
        let driver = tokio::spawn(drive(
            store.clone(),
            flights,
            hotels,
            config.flow.auto_select,
        ));
        Self { store, driver }
    }

    /// Session over the canned mock adapters, with latencies taken from the
    /// configuration.
    pub fn with_mocks(config: &SessionConfig) -> Self {
        let jitter = Duration::from_millis(config.search.jitter_ms);
        let flights = MockFlightSearch::new()
            .with_latency(Duration::from_millis(config.search.flight_delay_ms))
            .with_jitter(jitter);
        let hotels = MockHotelSearch::new()
            .with_latency(Duration::from_millis(config.search.hotel_delay_ms))
            .with_jitter(jitter);
        Self::start(config, Arc::new(flights), Arc::new(hotels))
    }

    pub fn store(&self) -> Arc<BookingStore> {
        self.store.clone()
    }

    /// State-and-dispatch pair for child components.
    pub fn handle(&self) -> BookingHandle {
        BookingHandle::new(self.store.clone())
    }

    /// Stop the driver and abandon any in-flight lookup. Dropping the
    /// session does the same.
    pub fn shutdown(self) {}
}

impl Drop for TripSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    store: Arc<BookingStore>,
    flights: Arc<dyn FlightSearch>,
    hotels: Arc<dyn HotelSearch>,
    auto_select: bool,
) {
    let mut states = WatchStream::new(store.subscribe());
    let mut active: Option<(u64, JoinHandle<()>)> = None;

    info!(auto_select, "session driver started");
    while let Some(state) = states.next().await {
        match &state.stage {
            Stage::SearchingFlights => {
                if active.as_ref().map(|(seq, _)| *seq) != Some(state.search_seq) {
                    abort_active(&mut active);
                    let handle = spawn_flight_lookup(store.clone(), flights.clone(), &state);
                    active = Some((state.search_seq, handle));
                }
            }
            Stage::SearchingHotels => {
                if active.as_ref().map(|(seq, _)| *seq) != Some(state.search_seq) {
                    abort_active(&mut active);
                    let handle = spawn_hotel_lookup(store.clone(), hotels.clone(), &state);
                    active = Some((state.search_seq, handle));
                }
            }
            stage => {
                // The flow left the searching stage, either because the
                // lookup completed or because the user navigated away.
                abort_active(&mut active);

                if auto_select {
                    match stage {
                        Stage::FlightResults => match cheapest_flight(&state.flight_offers) {
                            Some(best) => {
                                info!(
                                    airline = %best.airline,
                                    price = best.price_amount,
                                    "auto-selecting cheapest flight"
                                );
                                let flight_id = best.id;
                                store.dispatch(BookingEvent::FlightSelected { flight_id });
                                store.dispatch(BookingEvent::HotelSearchRequested);
                            }
                            None => warn!("flight search returned no offers"),
                        },
                        Stage::HotelResults => match top_rated_hotel(&state.hotel_offers) {
                            Some(best) => {
                                info!(
                                    name = %best.name,
                                    rating = best.rating,
                                    "auto-selecting top-rated hotel"
                                );
                                let hotel_id = best.id;
                                store.dispatch(BookingEvent::HotelSelected { hotel_id });
                            }
                            None => warn!("hotel search returned no offers"),
                        },
                        _ => {}
                    }
                }
            }
        }
    }
    debug!("session driver stopped");
}

fn abort_active(active: &mut Option<(u64, JoinHandle<()>)>) {
    if let Some((seq, handle)) = active.take() {
        debug!(search_seq = seq, "releasing lookup task");
        handle.abort();
    }
}

fn spawn_flight_lookup(
    store: Arc<BookingStore>,
    adapter: Arc<dyn FlightSearch>,
    state: &BookingState,
) -> JoinHandle<()> {
    let search_seq = state.search_seq;
    let inputs = state.inputs.clone();
    tokio::spawn(async move {
        let (Some(start), Some(end)) = (inputs.start_date, inputs.end_date) else {
            return;
        };
        debug!(destination = %inputs.destination, search_seq, "flight lookup started");

        let event = match adapter.search_flights(&inputs.destination, start, end).await {
            Ok(offers) => BookingEvent::FlightSearchCompleted { offers },
            Err(SearchError::Cancelled) => return,
            Err(SearchError::Failed(message)) => {
                error!(%message, "flight lookup failed");
                BookingEvent::SearchFailed { message }
            }
        };

        if store.dispatch_for_search(search_seq, event).is_none() {
            debug!(search_seq, "flight lookup result superseded");
        }
    })
}

fn spawn_hotel_lookup(
    store: Arc<BookingStore>,
    adapter: Arc<dyn HotelSearch>,
    state: &BookingState,
) -> JoinHandle<()> {
    let search_seq = state.search_seq;
    let inputs = state.inputs.clone();
    tokio::spawn(async move {
        let (Some(start), Some(end)) = (inputs.start_date, inputs.end_date) else {
            return;
        };
        debug!(destination = %inputs.destination, search_seq, "hotel lookup started");

        let event = match adapter.search_hotels(&inputs.destination, start, end).await {
            Ok(offers) => BookingEvent::HotelSearchCompleted { offers },
            Err(SearchError::Cancelled) => return,
            Err(SearchError::Failed(message)) => {
                error!(%message, "hotel lookup failed");
                BookingEvent::SearchFailed { message }
            }
        };

        if store.dispatch_for_search(search_seq, event).is_none() {
            debug!(search_seq, "hotel lookup result superseded");
        }
    })
}
