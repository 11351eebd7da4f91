//! History adapter contract and an in-memory implementation.
//!
//! The core only ever reads an adapter's current location/action, subscribes
//! to its change notifications, and forwards navigation method calls. The
//! adapter owns the authoritative current location; the store's slice is a
//! replica kept consistent through the event stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use crate::action::HistoryAction;
use crate::location::Location;

/// Callback invoked for every navigation the adapter performs, with the new
/// location and the action kind that produced it.
pub type Listener = Box<dyn FnMut(Location, HistoryAction) + Send>;

/// An active listener registration.
///
/// Call [`unsubscribe`](Subscription::unsubscribe) to cancel delivery.
/// Dropping the subscription does **not** cancel it; release is an explicit
/// step so a handle can be stored and torn down at a time of the caller's
/// choosing.
pub struct Subscription {
    cancel: Box<dyn FnOnce() + Send>,
}

impl Subscription {
    /// Wrap an unsubscribe closure.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Cancel the registration. After this returns, the listener is never
    /// invoked again.
    pub fn unsubscribe(self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}

/// The external history object this crate synchronizes against.
///
/// Implementations must deliver notifications synchronously, in navigation
/// order, to every registered listener; that delivery order is the only
/// ordering guarantee the synchronization core relies on.
pub trait History {
    /// The location the adapter currently reflects.
    fn location(&self) -> Location;

    /// The action kind that produced the current location.
    fn action(&self) -> HistoryAction;

    /// Register a listener for subsequent navigations.
    fn listen(&self, listener: Listener) -> Subscription;

    /// Append a new entry at `path`, discarding any forward entries.
    fn push(&self, path: &str, state: Option<Value>);

    /// Replace the current entry with `path`.
    fn replace(&self, path: &str, state: Option<Value>);

    /// Move `delta` entries through the stack (negative is back).
    fn go(&self, delta: isize);

    /// Move one entry back.
    fn go_back(&self) {
        self.go(-1);
    }

    /// Move one entry forward.
    fn go_forward(&self) {
        self.go(1);
    }
}

/// One entry in a [`MemoryHistory`] stack.
#[derive(Debug, Clone)]
struct HistoryEntry {
    location: Location,
    state: Option<Value>,
}

/// Entry stack plus cursor. The `action` field records how the cursor last
/// moved, which seeds the store slice at initialization.
struct EntryStack {
    entries: Vec<HistoryEntry>,
    index: usize,
    action: HistoryAction,
}

struct HistoryInner {
    stack: Mutex<EntryStack>,
    listeners: Mutex<Vec<(u64, Arc<Mutex<Listener>>)>>,
    next_listener_id: AtomicU64,
}

/// An in-memory [`History`] implementation.
///
/// Useful for tests and for hosts without a real navigation surface. Starts
/// at `/` with action `POP`, the state a freshly created history object is
/// in before any navigation.
///
/// `Clone` is cheap: all state is behind a shared `Arc`, so clones observe
/// and mutate the same history.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Arc<HistoryInner>,
}

impl MemoryHistory {
    /// Create a history positioned at `/`.
    pub fn new() -> Self {
        Self::from_path("/")
    }

    /// Create a history positioned at `path`.
    pub fn from_path(path: &str) -> Self {
        let entry = HistoryEntry {
            location: Location::parse(path),
            state: None,
        };
        Self {
            inner: Arc::new(HistoryInner {
                stack: Mutex::new(EntryStack {
                    entries: vec![entry],
                    index: 0,
                    action: HistoryAction::Pop,
                }),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Number of entries currently on the stack.
    pub fn depth(&self) -> usize {
        self.inner.stack.lock().entries.len()
    }

    /// Zero-based cursor position within the stack.
    pub fn index(&self) -> usize {
        self.inner.stack.lock().index
    }

    /// The opaque state value attached to the current entry, if any.
    pub fn current_state(&self) -> Option<Value> {
        let stack = self.inner.stack.lock();
        stack.entries[stack.index].state.clone()
    }

    /// Invoke every listener with the new location, in registration order.
    ///
    /// The listener table is snapshotted before any callback runs, so a
    /// listener that subscribes or unsubscribes during delivery cannot
    /// perturb this round.
    fn notify(&self, location: Location, action: HistoryAction) {
        let listeners: Vec<Arc<Mutex<Listener>>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            let mut listener = listener.lock();
            (*listener)(location.clone(), action);
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stack = self.inner.stack.lock();
        f.debug_struct("MemoryHistory")
            .field("depth", &stack.entries.len())
            .field("index", &stack.index)
            .field("action", &stack.action)
            .finish()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let stack = self.inner.stack.lock();
        stack.entries[stack.index].location.clone()
    }

    fn action(&self) -> HistoryAction {
        self.inner.stack.lock().action
    }

    fn listen(&self, listener: Listener) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .push((id, Arc::new(Mutex::new(listener))));

        // Weak so an outstanding subscription does not keep the history alive.
        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .listeners
                    .lock()
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    fn push(&self, path: &str, state: Option<Value>) {
        let location = Location::parse(path);
        tracing::debug!(path, "history push");
        {
            let mut stack = self.inner.stack.lock();
            let next_index = stack.index + 1;
            // Pushing from mid-stack discards the forward entries.
            stack.entries.truncate(next_index);
            stack.entries.push(HistoryEntry {
                location: location.clone(),
                state,
            });
            stack.index = next_index;
            stack.action = HistoryAction::Push;
        }
        self.notify(location, HistoryAction::Push);
    }

    fn replace(&self, path: &str, state: Option<Value>) {
        let location = Location::parse(path);
        tracing::debug!(path, "history replace");
        {
            let mut stack = self.inner.stack.lock();
            let index = stack.index;
            stack.entries[index] = HistoryEntry {
                location: location.clone(),
                state,
            };
            stack.action = HistoryAction::Replace;
        }
        self.notify(location, HistoryAction::Replace);
    }

    fn go(&self, delta: isize) {
        let location = {
            let mut stack = self.inner.stack.lock();
            let target = stack.index as isize + delta;
            if target < 0 || target >= stack.entries.len() as isize {
                tracing::warn!(
                    delta,
                    index = stack.index,
                    depth = stack.entries.len(),
                    "history go out of range, ignoring"
                );
                return;
            }
            stack.index = target as usize;
            stack.action = HistoryAction::Pop;
            stack.entries[stack.index].location.clone()
        };
        tracing::debug!(delta, "history go");
        self.notify(location, HistoryAction::Pop);
    }
}
