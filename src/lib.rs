//! Bidirectional synchronization between a navigation history and a
//! single-store application state.
//!
//! The history adapter owns the authoritative location; the store holds a
//! replica slice. Navigation flows in both directions: a dispatched
//! history-call action is intercepted by [`RouterMiddleware`] and applied to
//! the adapter, and every adapter notification is re-dispatched by
//! [`sync_history_with_store`] as a location-change event that
//! [`LocationReducer`] folds into the slice.

mod action;
pub use action::{
    CALL_HISTORY_METHOD, HistoryAction, HistoryMethod, HistoryMethodCall, LOCATION_CHANGE,
    LocationChange, RouterAction, StoreAction,
};
mod bridge;
pub use bridge::{SyncHandle, sync_history_with_store};
mod error;
pub use error::RouterError;
mod history;
pub use history::{History, Listener, MemoryHistory, Subscription};
mod location;
pub use location::{Location, decode_query};
mod middleware;
pub use middleware::RouterMiddleware;
mod reducer;
pub use reducer::LocationReducer;
mod state;
pub use state::{JsonSlice, RouterSlice, RouterState};
