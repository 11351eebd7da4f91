//! The subscription bridge from history notifications into store dispatch.

use crate::action::{LocationChange, RouterAction};
use crate::history::{History, Subscription};

/// Handle for the active history-to-store synchronization.
///
/// Returned by [`sync_history_with_store`]. Call
/// [`dispose`](SyncHandle::dispose) when the store/adapter pairing is torn
/// down; after disposal no further dispatches occur even if the adapter
/// keeps emitting. Dropping the handle does **not** dispose it.
#[derive(Debug)]
pub struct SyncHandle {
    subscription: Subscription,
}

impl SyncHandle {
    /// Cancel the bridge's subscription.
    pub fn dispose(self) {
        tracing::debug!("disposing history synchronization");
        self.subscription.unsubscribe();
    }
}

/// Start synchronizing `history` into a store's dispatch seam.
///
/// Immediately dispatches one location-change event built from the adapter's
/// current location and action, flagged as first render, then subscribes to
/// the adapter and re-dispatches every subsequent notification unflagged, in
/// the exact order the adapter emits them. The bridge performs no
/// reordering, batching, or coalescing; dispatch happens synchronously
/// inside the adapter's callback.
///
/// Activating the bridge twice against the same pairing is not guarded and
/// produces duplicate dispatches for every navigation; single activation is
/// the caller's responsibility.
///
/// # Arguments
///
/// * `history` - The adapter to observe.
/// * `dispatch` - The store's dispatch seam, invoked once per event.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use histsync::{History, MemoryHistory, sync_history_with_store};
///
/// let history = MemoryHistory::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let handle = sync_history_with_store(&history, move |action| {
///     sink.lock().unwrap().push(action);
/// });
/// history.push("/inbox", None);
/// handle.dispose();
/// history.push("/ignored", None);
///
/// let seen = seen.lock().unwrap();
/// assert_eq!(seen.len(), 2); // initial first-render event + one push
/// ```
pub fn sync_history_with_store<H, D>(history: &H, mut dispatch: D) -> SyncHandle
where
    H: History,
    D: FnMut(RouterAction) + Send + 'static,
{
    let initial = LocationChange::first_render(history.location(), history.action());
    tracing::debug!(location = %initial.location, "dispatching initial location");
    dispatch(RouterAction::LocationChange(initial));

    let subscription = history.listen(Box::new(move |location, action| {
        tracing::debug!(%location, %action, "dispatching location change");
        dispatch(RouterAction::LocationChange(LocationChange::new(
            location, action,
        )));
    }));

    SyncHandle { subscription }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::action::HistoryAction;
    use crate::history::MemoryHistory;

    /// Collects dispatched actions behind a shared handle.
    fn collector() -> (
        Arc<Mutex<Vec<RouterAction>>>,
        impl FnMut(RouterAction) + Send + 'static,
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        (log, move |action| sink.lock().push(action))
    }

    fn changes(log: &Arc<Mutex<Vec<RouterAction>>>) -> Vec<LocationChange> {
        log.lock()
            .iter()
            .map(|action| match action {
                RouterAction::LocationChange(change) => change.clone(),
                other => panic!("bridge dispatched a non-location-change action: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn activation_dispatches_current_location_as_first_render() {
        let history = MemoryHistory::from_path("/start?a=1");
        let (log, dispatch) = collector();

        let _handle = sync_history_with_store(&history, dispatch);

        let events = changes(&log);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_first_rendering);
        assert_eq!(events[0].location.pathname, "/start");
        assert_eq!(events[0].location.search, "?a=1");
        assert_eq!(events[0].action, HistoryAction::Pop);
    }

    #[test]
    fn subsequent_notifications_are_not_first_render() {
        let history = MemoryHistory::new();
        let (log, dispatch) = collector();
        let _handle = sync_history_with_store(&history, dispatch);

        history.push("/a", None);
        history.replace("/b", None);

        let events = changes(&log);
        assert_eq!(events.len(), 3);
        assert!(!events[1].is_first_rendering);
        assert_eq!(events[1].action, HistoryAction::Push);
        assert!(!events[2].is_first_rendering);
        assert_eq!(events[2].action, HistoryAction::Replace);
    }

    #[test]
    fn events_arrive_in_emission_order() {
        let history = MemoryHistory::new();
        let (log, dispatch) = collector();
        let _handle = sync_history_with_store(&history, dispatch);

        history.push("/a", None);
        history.push("/b", None);
        history.go_back();
        history.go_forward();

        let pathnames: Vec<String> = changes(&log)
            .into_iter()
            .map(|change| change.location.pathname)
            .collect();
        assert_eq!(pathnames, vec!["/", "/a", "/b", "/a", "/b"]);
    }

    #[test]
    fn disposal_stops_dispatching() {
        let history = MemoryHistory::new();
        let (log, dispatch) = collector();
        let handle = sync_history_with_store(&history, dispatch);

        history.push("/a", None);
        let count_before = log.lock().len();

        handle.dispose();
        history.push("/b", None);
        history.go_back();

        assert_eq!(log.lock().len(), count_before);
    }

    #[test]
    fn double_activation_duplicates_dispatches() {
        // Not guarded, by contract; the duplicate is the documented symptom.
        let history = MemoryHistory::new();
        let (log, dispatch) = collector();
        let log_clone = Arc::clone(&log);
        let _first = sync_history_with_store(&history, dispatch);
        let _second =
            sync_history_with_store(&history, move |action| log_clone.lock().push(action));

        history.push("/a", None);

        // Two initial events plus two copies of the navigation.
        assert_eq!(log.lock().len(), 4);
    }
}
