use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

use tripline_flow::{BookingEvent, BookingMachine, BookingState, Transition};

/// Injectable state container for one booking flow instance.
///
/// Owned by whoever drives the page; there is no process-wide singleton.
/// Subscribers are notified through a watch channel whenever a dispatched
/// event actually changed the state.
pub struct BookingStore {
    machine: Mutex<BookingMachine>,
    tx: watch::Sender<BookingState>,
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore {
    pub fn new() -> Self {
        Self::with_state(BookingState::new())
    }

    pub fn with_state(state: BookingState) -> Self {
        let (tx, _rx) = watch::channel(state.clone());
        Self {
            machine: Mutex::new(BookingMachine::with_state(state)),
            tx,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> BookingState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes. The receiver always holds the latest
    /// state; intermediate states may be coalesced.
    pub fn subscribe(&self) -> watch::Receiver<BookingState> {
        self.tx.subscribe()
    }

    /// Apply one event and notify subscribers if anything changed.
    pub fn dispatch(&self, event: BookingEvent) -> Transition {
        let mut machine = self.machine.lock().expect("booking machine mutex poisoned");
        let transition = machine.handle_event(event);
        if transition.changed {
            self.tx.send_replace(machine.state().clone());
        }
        transition
    }

    /// Apply a lookup completion only if the flow is still waiting on that
    /// exact lookup. Returns `None` when the completion is stale: the state
    /// check and the event application happen under one lock, so a newer
    /// search can never be clobbered by an older result.
    pub fn dispatch_for_search(&self, search_seq: u64, event: BookingEvent) -> Option<Transition> {
        let mut machine = self.machine.lock().expect("booking machine mutex poisoned");
        let state = machine.state();
        if !state.stage.is_searching() || state.search_seq != search_seq {
            debug!(
                search_seq,
                current_seq = state.search_seq,
                stage = state.stage.label(),
                "dropping stale search completion"
            );
            return None;
        }

        let transition = machine.handle_event(event);
        if transition.changed {
            self.tx.send_replace(machine.state().clone());
        }
        Some(transition)
    }

    /// Serializable snapshot of the current state.
    pub fn snapshot(&self) -> BookingState {
        self.state()
    }

    /// Replace the state wholesale (e.g. from a deserialized snapshot) and
    /// notify subscribers.
    pub fn restore(&self, state: BookingState) {
        let mut machine = self.machine.lock().expect("booking machine mutex poisoned");
        machine.restore(state.clone());
        self.tx.send_replace(state);
    }
}

/// Cheap clonable state-and-dispatch pair handed to child components instead
/// of an ambient context lookup.
#[derive(Clone)]
pub struct BookingHandle {
    store: Arc<BookingStore>,
}

impl BookingHandle {
    pub fn new(store: Arc<BookingStore>) -> Self {
        Self { store }
    }

    pub fn state(&self) -> BookingState {
        self.store.state()
    }

    pub fn dispatch(&self, event: BookingEvent) -> Transition {
        self.store.dispatch(event)
    }

    pub fn subscribe(&self) -> watch::Receiver<BookingState> {
        self.store.subscribe()
    }
}

impl From<Arc<BookingStore>> for BookingHandle {
    fn from(store: Arc<BookingStore>) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tripline_core::InputPatch;
    use tripline_flow::Stage;

    fn complete_inputs(store: &BookingStore) {
        store.dispatch(BookingEvent::InputsUpdated {
            patch: InputPatch::destination("Paris"),
        });
        store.dispatch(BookingEvent::InputsUpdated {
            patch: InputPatch::start_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        });
        store.dispatch(BookingEvent::InputsUpdated {
            patch: InputPatch::end_date(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()),
        });
    }

    #[test]
    fn test_subscribers_see_changes_and_skip_no_ops() {
        let store = BookingStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        // A no-op event publishes nothing.
        store.dispatch(BookingEvent::Back);
        assert!(!rx.has_changed().unwrap());

        store.dispatch(BookingEvent::InputsUpdated {
            patch: InputPatch::destination("Paris"),
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().inputs.destination, "Paris");
    }

    #[test]
    fn test_stale_completion_is_dropped_under_lock() {
        let store = BookingStore::new();
        complete_inputs(&store);
        let seq = store.state().search_seq;
        assert_eq!(store.state().stage, Stage::SearchingFlights);

        // A re-edit supersedes the outstanding lookup.
        store.dispatch(BookingEvent::InputsUpdated {
            patch: InputPatch::destination("Rome"),
        });
        assert_eq!(store.state().search_seq, seq + 1);

        // The old lookup's completion must not land.
        let stale = store.dispatch_for_search(
            seq,
            BookingEvent::FlightSearchCompleted { offers: vec![] },
        );
        assert!(stale.is_none());
        assert_eq!(store.state().stage, Stage::SearchingFlights);

        // The current one does.
        let fresh = store.dispatch_for_search(
            seq + 1,
            BookingEvent::FlightSearchCompleted { offers: vec![] },
        );
        assert!(fresh.is_some());
        assert_eq!(store.state().stage, Stage::FlightResults);
    }

    #[test]
    fn test_snapshot_restore_notifies_subscribers() {
        let store = BookingStore::new();
        complete_inputs(&store);
        let snapshot = store.snapshot();

        let other = BookingStore::new();
        let mut rx = other.subscribe();
        other.restore(snapshot.clone());
        assert!(rx.has_changed().unwrap());
        assert_eq!(other.state(), snapshot);
    }

    #[test]
    fn test_handle_delegates_to_store() {
        let store = Arc::new(BookingStore::new());
        let handle = BookingHandle::new(store.clone());

        handle.dispatch(BookingEvent::InputsUpdated {
            patch: InputPatch::destination("Lisbon"),
        });
        assert_eq!(store.state().inputs.destination, "Lisbon");
        assert_eq!(handle.state(), store.state());
    }
}
