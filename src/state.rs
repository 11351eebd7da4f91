//! Router state slice and the container capability seam.
//!
//! Different host applications keep their state tree in different container
//! shapes. The reducer is written against [`RouterSlice`], a minimal
//! capability set (read fields, replace wholesale, compare by identity), and
//! each container family supplies one adapter. The same property suite runs
//! against every adapter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::HistoryAction;
use crate::location::Location;

/// The portion of global state owned by this crate: the current location and
/// the navigation kind that produced it.
///
/// The slice is replaced wholesale on every effective transition; location
/// and action always arrive together and are atomically valid, so there is
/// no partial merge with previous state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterState {
    /// The last-applied location descriptor.
    pub location: Location,
    /// The navigation kind of the last transition.
    pub action: HistoryAction,
}

/// Capability set the reducer needs from a state container.
///
/// # Contract
///
/// - `clone` must preserve identity: a clone and its source compare equal
///   under [`same_identity`](RouterSlice::same_identity).
/// - [`from_parts`](RouterSlice::from_parts) must mint a fresh identity every
///   call, even for field-equal inputs. Downstream change detection relies on
///   identity, not structural equality, to decide whether observers re-run.
pub trait RouterSlice: Clone {
    /// Read the current location.
    fn location(&self) -> Location;

    /// Read the navigation kind of the last transition.
    fn action(&self) -> HistoryAction;

    /// Build a replacement slice from a location and action.
    fn from_parts(location: Location, action: HistoryAction) -> Self;

    /// Whether two slices are the same instance, not merely field-equal.
    fn same_identity(&self, other: &Self) -> bool;
}

/// The typed, structurally-shared container family. Identity is pointer
/// equality on the shared allocation.
impl RouterSlice for Arc<RouterState> {
    fn location(&self) -> Location {
        self.as_ref().location.clone()
    }

    fn action(&self) -> HistoryAction {
        self.as_ref().action
    }

    fn from_parts(location: Location, action: HistoryAction) -> Self {
        Arc::new(RouterState { location, action })
    }

    fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

/// The dynamic-mapping container family: the slice is a shared JSON object
/// with `location` and `action` fields, for hosts that keep their state tree
/// untyped.
///
/// Reads degrade to defaults when the map is malformed; a desynchronized
/// container never blocks navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSlice(Arc<Map<String, Value>>);

impl JsonSlice {
    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl RouterSlice for JsonSlice {
    fn location(&self) -> Location {
        self.0
            .get("location")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    fn action(&self) -> HistoryAction {
        self.0
            .get("action")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    fn from_parts(location: Location, action: HistoryAction) -> Self {
        let mut map = Map::new();
        // Serialization of these types cannot fail; both are plain data.
        map.insert(
            "location".to_owned(),
            serde_json::to_value(location).unwrap_or(Value::Null),
        );
        map.insert(
            "action".to_owned(),
            serde_json::to_value(action).unwrap_or(Value::Null),
        );
        Self(Arc::new(map))
    }

    fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parts() -> (Location, HistoryAction) {
        (Location::parse("/a/b?c=d#e"), HistoryAction::Push)
    }

    #[test]
    fn clone_preserves_identity_for_shared_slice() {
        let (location, action) = sample_parts();
        let slice = <Arc<RouterState>>::from_parts(location, action);
        let clone = slice.clone();
        assert!(slice.same_identity(&clone));
    }

    #[test]
    fn clone_preserves_identity_for_json_slice() {
        let (location, action) = sample_parts();
        let slice = JsonSlice::from_parts(location, action);
        let clone = slice.clone();
        assert!(slice.same_identity(&clone));
    }

    #[test]
    fn from_parts_mints_fresh_identity_even_for_equal_fields() {
        let (location, action) = sample_parts();
        let a = <Arc<RouterState>>::from_parts(location.clone(), action);
        let b = <Arc<RouterState>>::from_parts(location, action);
        assert_eq!(a, b);
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn shared_slice_reads_back_fields() {
        let (location, action) = sample_parts();
        let slice = <Arc<RouterState>>::from_parts(location.clone(), action);
        assert_eq!(slice.location(), location);
        assert_eq!(slice.action(), action);
    }

    #[test]
    fn json_slice_reads_back_fields() {
        let (location, action) = sample_parts();
        let slice = JsonSlice::from_parts(location.clone(), action);
        assert_eq!(slice.location(), location);
        assert_eq!(slice.action(), action);
    }

    #[test]
    fn json_slice_wire_shape() {
        let slice = JsonSlice::from_parts(Location::parse("/x?y=z"), HistoryAction::Replace);
        let map = slice.as_map();
        assert_eq!(map["action"], serde_json::json!("REPLACE"));
        assert_eq!(map["location"]["pathname"], serde_json::json!("/x"));
    }

    #[test]
    fn malformed_json_slice_degrades_to_defaults() {
        let mut map = Map::new();
        map.insert("location".to_owned(), Value::from(42));
        map.insert("action".to_owned(), Value::from("SIDEWAYS"));
        let slice = JsonSlice(Arc::new(map));
        assert_eq!(slice.location(), Location::default());
        assert_eq!(slice.action(), HistoryAction::Pop);
    }
}
