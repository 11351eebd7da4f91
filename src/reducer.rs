//! The pure fold from navigation events into the router state slice.

use crate::action::StoreAction;
use crate::history::History;
use crate::location::decode_query;
use crate::state::RouterSlice;

/// Pure state-transition function for the router slice.
///
/// Holds a handle to the history adapter so an absent slice can be seeded
/// lazily from the adapter's current location, which lets the reducer work
/// under arbitrary state-slicing and combination schemes.
///
/// # Contract
///
/// - An action that is not a location change returns the state unchanged,
///   preserving identity so upstream change detection short-circuits.
/// - A first-render event returns the state unchanged as well: the adapter
///   already reflects that location at activation time, and a redundant
///   dispatch must not perturb identity.
/// - Every other location change replaces the slice wholesale with a fresh
///   identity, even when the incoming descriptor is field-equal to the
///   current one. Deduplication is reserved strictly for the two cases
///   above.
/// - An incoming location without a decoded `query` gets one derived from
///   its `search`; a location that already carries a `query` keeps it
///   verbatim, with no merge and no re-decode.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use histsync::{
///     HistoryAction, Location, LocationChange, LocationReducer, MemoryHistory, RouterAction,
///     RouterSlice, RouterState,
/// };
///
/// let history = MemoryHistory::new();
/// let reducer = LocationReducer::new(history.clone());
///
/// // Lazily seeded from the adapter.
/// let state: Arc<RouterState> = reducer.reduce(None, &RouterAction::go_back());
/// assert_eq!(state.location.pathname, "/");
/// assert_eq!(state.action, HistoryAction::Pop);
///
/// // A location change replaces the slice and derives the query mapping.
/// let event = RouterAction::LocationChange(LocationChange::new(
///     Location::parse("/path/to/somewhere?query=test"),
///     HistoryAction::Push,
/// ));
/// let next = reducer.reduce(Some(&state), &event);
/// assert!(!next.same_identity(&state));
/// assert_eq!(next.location.query.as_ref().unwrap()["query"], "test");
/// ```
#[derive(Debug, Clone)]
pub struct LocationReducer<H> {
    history: H,
}

impl<H: History> LocationReducer<H> {
    /// Build a reducer seeded from `history`.
    pub fn new(history: H) -> Self {
        Self { history }
    }

    /// Fold one dispatched action into the slice.
    ///
    /// `None` state materializes the default slice from the adapter's
    /// current location and action before the event is considered.
    pub fn reduce<S, A>(&self, state: Option<&S>, action: &A) -> S
    where
        S: RouterSlice,
        A: StoreAction,
    {
        let current = match state {
            // Clones share identity with the source slice.
            Some(slice) => slice.clone(),
            None => S::from_parts(self.history.location(), self.history.action()),
        };

        let Some(change) = action.as_location_change() else {
            return current;
        };
        if change.is_first_rendering {
            return current;
        }

        let mut location = change.location.clone();
        if location.query.is_none() {
            location.query = Some(decode_query(&location.search));
        }
        S::from_parts(location, change.action)
    }
}
