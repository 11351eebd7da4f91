//! Router actions and their stable wire contract.
//!
//! Two action shapes cross the store boundary: a location-change event
//! produced by the bridge when the history adapter emits, and a history-call
//! request produced by application code and intercepted by the middleware.
//! Both serialize adjacently tagged as `{"type": ..., "payload": ...}` so the
//! contract is identical for every state-container variant.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::location::Location;

/// Wire type string for location-change events.
pub const LOCATION_CHANGE: &str = "@@router/LOCATION_CHANGE";

/// Wire type string for history-call requests.
pub const CALL_HISTORY_METHOD: &str = "@@router/CALL_HISTORY_METHOD";

/// The kind of navigation that produced a location.
///
/// `Pop` covers both external navigation (back/forward) and the initial
/// location a history adapter starts at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    /// A new entry was appended.
    Push,
    /// The current entry was replaced in place.
    Replace,
    /// The current index moved within existing entries.
    #[default]
    Pop,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryAction::Push => "PUSH",
            HistoryAction::Replace => "REPLACE",
            HistoryAction::Pop => "POP",
        })
    }
}

/// Payload of a location-change event: the new location, the action that
/// produced it, and whether this is the initial synchronization dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationChange {
    /// The location the history adapter now reflects.
    pub location: Location,
    /// The navigation kind that produced it.
    pub action: HistoryAction,
    /// Set on the one dispatch issued at bridge activation. The adapter
    /// already reflects this location at that point, so the reducer must
    /// treat the event as a no-op.
    #[serde(
        rename = "isFirstRendering",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_first_rendering: bool,
}

impl LocationChange {
    /// Build a regular (non-first-render) location-change payload.
    pub fn new(location: Location, action: HistoryAction) -> Self {
        Self {
            location,
            action,
            is_first_rendering: false,
        }
    }

    /// Build the initial synchronization payload, flagged as first render.
    pub fn first_render(location: Location, action: HistoryAction) -> Self {
        Self {
            location,
            action,
            is_first_rendering: true,
        }
    }
}

/// A history-adapter method named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryMethod {
    Push,
    Replace,
    Go,
    GoBack,
    GoForward,
}

impl fmt::Display for HistoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryMethod::Push => "push",
            HistoryMethod::Replace => "replace",
            HistoryMethod::Go => "go",
            HistoryMethod::GoBack => "goBack",
            HistoryMethod::GoForward => "goForward",
        })
    }
}

/// Payload of a history-call request: the method to invoke and its argument
/// list.
///
/// Arguments are opaque JSON values because the caller does not know which
/// adapter implementation will receive them; the middleware decodes each
/// position when it invokes the method and rejects lists the method cannot
/// accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMethodCall {
    /// The adapter method to invoke.
    pub method: HistoryMethod,
    /// Positional arguments, e.g. `[path, state?]` for `push`.
    #[serde(default)]
    pub args: Vec<Value>,
}

/// An action owned by this crate, adjacently tagged with the stable
/// `@@router/...` type strings.
///
/// # Examples
///
/// ```
/// use histsync::RouterAction;
///
/// let action = RouterAction::push("/inbox");
/// let wire = serde_json::to_value(&action).unwrap();
/// assert_eq!(wire["type"], "@@router/CALL_HISTORY_METHOD");
/// assert_eq!(wire["payload"]["method"], "push");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RouterAction {
    /// The history adapter moved to a new location.
    #[serde(rename = "@@router/LOCATION_CHANGE")]
    LocationChange(LocationChange),
    /// Application code requests a history-adapter method invocation.
    #[serde(rename = "@@router/CALL_HISTORY_METHOD")]
    CallHistoryMethod(HistoryMethodCall),
}

impl RouterAction {
    /// Request appending a new history entry at `path`.
    pub fn push(path: impl Into<String>) -> Self {
        Self::call(HistoryMethod::Push, vec![Value::String(path.into())])
    }

    /// Like [`push`](RouterAction::push), with an opaque state value attached
    /// to the new entry.
    pub fn push_with_state(path: impl Into<String>, state: Value) -> Self {
        Self::call(HistoryMethod::Push, vec![Value::String(path.into()), state])
    }

    /// Request replacing the current history entry with `path`.
    pub fn replace(path: impl Into<String>) -> Self {
        Self::call(HistoryMethod::Replace, vec![Value::String(path.into())])
    }

    /// Like [`replace`](RouterAction::replace), with an opaque state value.
    pub fn replace_with_state(path: impl Into<String>, state: Value) -> Self {
        Self::call(
            HistoryMethod::Replace,
            vec![Value::String(path.into()), state],
        )
    }

    /// Request moving `delta` entries through the history stack.
    pub fn go(delta: isize) -> Self {
        Self::call(HistoryMethod::Go, vec![Value::from(delta as i64)])
    }

    /// Request moving one entry back.
    pub fn go_back() -> Self {
        Self::call(HistoryMethod::GoBack, Vec::new())
    }

    /// Request moving one entry forward.
    pub fn go_forward() -> Self {
        Self::call(HistoryMethod::GoForward, Vec::new())
    }

    fn call(method: HistoryMethod, args: Vec<Value>) -> Self {
        Self::CallHistoryMethod(HistoryMethodCall { method, args })
    }
}

/// The seam between this crate and a heterogeneous dispatch pipeline.
///
/// An application's own action type implements this so router events can
/// flow through the same store as domain actions. Both accessors default to
/// `None`, so unrelated action types implement the trait with an empty body
/// and the reducer's identity-preservation rule applies to them wholesale.
pub trait StoreAction {
    /// View this action as a location-change event, if it is one.
    fn as_location_change(&self) -> Option<&LocationChange> {
        None
    }

    /// View this action as a history-call request, if it is one.
    fn as_history_call(&self) -> Option<&HistoryMethodCall> {
        None
    }
}

impl StoreAction for RouterAction {
    fn as_location_change(&self) -> Option<&LocationChange> {
        match self {
            RouterAction::LocationChange(change) => Some(change),
            RouterAction::CallHistoryMethod(_) => None,
        }
    }

    fn as_history_call(&self) -> Option<&HistoryMethodCall> {
        match self {
            RouterAction::LocationChange(_) => None,
            RouterAction::CallHistoryMethod(call) => Some(call),
        }
    }
}
