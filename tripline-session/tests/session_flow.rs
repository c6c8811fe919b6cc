use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use tripline_core::{FlightOffer, InputPatch};
use tripline_flow::{BookingEvent, BookingState, Stage};
use tripline_search::{
    cheapest_flight, top_rated_hotel, FlightSearch, MockFlightSearch, MockHotelSearch, SearchError,
};
use tripline_session::{telemetry, SessionConfig, TripSession};

fn fast_config(auto_select: bool) -> SessionConfig {
    let mut config = SessionConfig::default();
    config.search.flight_delay_ms = 20;
    config.search.hotel_delay_ms = 20;
    config.flow.auto_select = auto_select;
    config
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn input(patch: InputPatch) -> BookingEvent {
    BookingEvent::InputsUpdated { patch }
}

async fn wait_for(
    rx: &mut watch::Receiver<BookingState>,
    what: &str,
    mut pred: impl FnMut(&BookingState) -> bool,
) -> BookingState {
    let result = timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = rx.borrow_and_update();
                if pred(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.expect("booking store dropped");
        }
    })
    .await;
    result.unwrap_or_else(|_| panic!("timed out waiting for {what}"))
}

#[tokio::test]
async fn test_express_flow_reaches_review_with_best_offers() {
    telemetry::init();
    let session = TripSession::with_mocks(&fast_config(true));
    let handle = session.handle();
    let mut rx = handle.subscribe();

    // Entering the form field by field: the search starts only once the
    // third required field lands.
    let t = handle.dispatch(input(InputPatch::destination("Paris")));
    assert_eq!(t.to, Stage::FlightSearch);
    let t = handle.dispatch(input(InputPatch::start_date(date(2024, 6, 1))));
    assert_eq!(t.to, Stage::FlightSearch);
    let t = handle.dispatch(input(InputPatch::end_date(date(2024, 6, 5))));
    assert_eq!(t.to, Stage::SearchingFlights);

    let state = wait_for(&mut rx, "review stage", |s| s.stage == Stage::Review).await;

    // Cheapest flight and top-rated hotel from the canned catalogs.
    let flight = state.selected_flight().expect("flight selected");
    assert_eq!(flight.airline, "Mountain Express");
    assert_eq!(flight.price_amount, 279);

    let hotel = state.selected_hotel().expect("hotel selected");
    assert_eq!(hotel.name, "Seaside Resort");
    assert_eq!(hotel.rating, 4.8);

    assert_eq!(state.trip_total(), 279 + 249);

    handle.dispatch(BookingEvent::Confirm);
    let state = wait_for(&mut rx, "confirmed stage", |s| s.stage == Stage::Confirmed).await;
    assert!(state.stage.is_terminal());
}

#[tokio::test]
async fn test_guided_flow_walks_the_wizard() {
    telemetry::init();
    let session = TripSession::with_mocks(&fast_config(false));
    let handle = session.handle();
    let mut rx = handle.subscribe();

    handle.dispatch(input(InputPatch::destination("Lisbon")));
    handle.dispatch(input(InputPatch::start_date(date(2024, 9, 10))));
    handle.dispatch(input(InputPatch::end_date(date(2024, 9, 17))));

    let state = wait_for(&mut rx, "flight results", |s| s.stage == Stage::FlightResults).await;
    assert_eq!(state.flight_offers.len(), 3);

    // Guided mode: the user picks. Take the cheapest, like the summary does.
    let flight_id = cheapest_flight(&state.flight_offers).unwrap().id;
    handle.dispatch(BookingEvent::FlightSelected { flight_id });
    assert_eq!(handle.state().stage, Stage::HotelSearch);

    handle.dispatch(BookingEvent::HotelSearchRequested);
    let state = wait_for(&mut rx, "hotel results", |s| s.stage == Stage::HotelResults).await;
    assert_eq!(state.hotel_offers.len(), 3);

    let hotel_id = top_rated_hotel(&state.hotel_offers).unwrap().id;
    handle.dispatch(BookingEvent::HotelSelected { hotel_id });
    assert_eq!(handle.state().stage, Stage::Review);

    // Back walks the fixed order one stage at a time.
    handle.dispatch(BookingEvent::Back);
    assert_eq!(handle.state().stage, Stage::HotelResults);
    handle.dispatch(BookingEvent::Back);
    assert_eq!(handle.state().stage, Stage::HotelSearch);
    handle.dispatch(BookingEvent::Back);
    assert_eq!(handle.state().stage, Stage::FlightResults);

    session.shutdown();
}

/// First call answers slowly with a marker catalog, second call quickly with
/// a different one, so a stale delivery is detectable.
struct SequencedFlightSearch {
    calls: AtomicUsize,
}

#[async_trait]
impl FlightSearch for SequencedFlightSearch {
    async fn search_flights(
        &self,
        _destination: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<FlightOffer>, SearchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            sleep(Duration::from_millis(400)).await;
            Ok(vec![FlightOffer::new("Stale Air", 999, "9h 00m")])
        } else {
            sleep(Duration::from_millis(50)).await;
            Ok(vec![FlightOffer::new("Fresh Air", 123, "1h 00m")])
        }
    }
}

#[tokio::test]
async fn test_superseded_search_never_delivers_its_result() {
    telemetry::init();
    let flights = Arc::new(SequencedFlightSearch {
        calls: AtomicUsize::new(0),
    });
    let hotels = Arc::new(MockHotelSearch::new().with_latency(Duration::from_millis(20)));
    let adapter: Arc<dyn FlightSearch> = flights.clone();
    let session = TripSession::start(&fast_config(false), adapter, hotels);
    let handle = session.handle();
    let mut rx = handle.subscribe();

    handle.dispatch(input(InputPatch::destination("Paris")));
    handle.dispatch(input(InputPatch::start_date(date(2024, 6, 1))));
    handle.dispatch(input(InputPatch::end_date(date(2024, 6, 5))));
    assert_eq!(handle.state().stage, Stage::SearchingFlights);

    // Re-edit once the slow lookup is actually underway: supersedes it.
    timeout(Duration::from_secs(5), async {
        while flights.calls.load(Ordering::SeqCst) == 0 {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("first lookup never started");
    handle.dispatch(input(InputPatch::destination("Rome")));

    let state = wait_for(&mut rx, "flight results", |s| s.stage == Stage::FlightResults).await;
    assert_eq!(state.flight_offers[0].airline, "Fresh Air");

    // Long after the superseded lookup would have completed, its result has
    // still not leaked into the state.
    sleep(Duration::from_millis(500)).await;
    let state = handle.state();
    assert_eq!(state.stage, Stage::FlightResults);
    assert_eq!(state.flight_offers.len(), 1);
    assert_eq!(state.flight_offers[0].airline, "Fresh Air");
}

#[tokio::test]
async fn test_search_failure_surfaces_and_reedit_retries() {
    telemetry::init();
    let flights = MockFlightSearch::new().with_latency(Duration::from_millis(20));
    flights.fail_next_requests(1);
    let hotels = MockHotelSearch::new().with_latency(Duration::from_millis(20));
    let session = TripSession::start(&fast_config(false), Arc::new(flights), Arc::new(hotels));
    let handle = session.handle();
    let mut rx = handle.subscribe();

    handle.dispatch(input(InputPatch::destination("Paris")));
    handle.dispatch(input(InputPatch::start_date(date(2024, 6, 1))));
    handle.dispatch(input(InputPatch::end_date(date(2024, 6, 5))));

    let state = wait_for(&mut rx, "failed stage", |s| {
        matches!(s.stage, Stage::Failed { .. })
    })
    .await;
    assert_eq!(
        state.stage,
        Stage::Failed {
            message: "Failed to search flights".to_string()
        }
    );

    // Editing a still-complete input set re-triggers the lookup, which now
    // succeeds.
    handle.dispatch(input(InputPatch::destination("Paris")));
    let state = wait_for(&mut rx, "flight results", |s| s.stage == Stage::FlightResults).await;
    assert_eq!(state.flight_offers.len(), 3);
}

#[tokio::test]
async fn test_snapshot_restore_round_trip_through_the_store() {
    telemetry::init();
    let session = TripSession::with_mocks(&fast_config(true));
    let handle = session.handle();
    let mut rx = handle.subscribe();

    handle.dispatch(input(InputPatch::destination("Paris")));
    handle.dispatch(input(InputPatch::start_date(date(2024, 6, 1))));
    handle.dispatch(input(InputPatch::end_date(date(2024, 6, 5))));
    let state = wait_for(&mut rx, "review stage", |s| s.stage == Stage::Review).await;

    let json = serde_json::to_string(&state).unwrap();
    let restored: BookingState = serde_json::from_str(&json).unwrap();

    let other = TripSession::with_mocks(&fast_config(true));
    other.store().restore(restored);
    let copy = other.handle().state();
    assert_eq!(copy.stage, Stage::Review);
    assert_eq!(copy.inputs, state.inputs);
    assert_eq!(copy.selected_flight_id, state.selected_flight_id);
    assert_eq!(copy.selected_hotel_id, state.selected_hotel_id);
}
