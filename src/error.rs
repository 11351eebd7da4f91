//! Crate-level error types for history-call interception.

use serde_json::Value;

use crate::action::HistoryMethod;

/// Error returned when a dispatched history-call action cannot be applied to
/// the adapter.
///
/// These are developer-facing integration errors: a malformed argument list
/// is a programming error in the dispatching code, so the error surfaces
/// synchronously to the dispatch caller and is never retried.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// A required positional argument was absent.
    #[error("`{method}` requires a {expected} argument at position {index}")]
    MissingArg {
        /// The method being invoked.
        method: HistoryMethod,
        /// What the position should have held.
        expected: &'static str,
        /// Zero-based argument position.
        index: usize,
    },

    /// A positional argument had the wrong shape.
    #[error("invalid argument for `{method}` at position {index}: expected {expected}, got {got}")]
    InvalidArg {
        /// The method being invoked.
        method: HistoryMethod,
        /// What the position should have held.
        expected: &'static str,
        /// Zero-based argument position.
        index: usize,
        /// The offending value.
        got: Value,
    },
}
