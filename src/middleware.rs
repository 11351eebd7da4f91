//! Interception of history-call actions on their way through dispatch.

use serde_json::Value;

use crate::action::{HistoryMethod, HistoryMethodCall, StoreAction};
use crate::error::RouterError;
use crate::history::History;

/// Dispatch-pipeline stage that turns history-call actions into history
/// mutations.
///
/// A history-call action is applied to the adapter and then **swallowed**:
/// the authoritative state update arrives asynchronously with respect to the
/// pipeline, via the bridge's dispatch of the navigation event the adapter
/// emits. Forwarding the call as well would make the reducer observe the
/// same navigation twice in differently-shaped actions, so downstream
/// middleware never sees history calls. Every other action passes through
/// untouched.
///
/// # Examples
///
/// ```
/// use histsync::{History, MemoryHistory, RouterAction, RouterMiddleware};
///
/// let history = MemoryHistory::new();
/// let middleware = RouterMiddleware::new(history.clone());
///
/// // Intercepted: the adapter navigates, the action stops here.
/// let forwarded = middleware.process(RouterAction::push("/inbox")).unwrap();
/// assert!(forwarded.is_none());
/// assert_eq!(history.location().pathname, "/inbox");
/// ```
#[derive(Debug, Clone)]
pub struct RouterMiddleware<H> {
    history: H,
}

impl<H: History> RouterMiddleware<H> {
    /// Build a middleware targeting `history`.
    pub fn new(history: H) -> Self {
        Self { history }
    }

    /// Run one action through the middleware.
    ///
    /// # Returns
    ///
    /// `Ok(Some(action))` when the action is not a history call and should
    /// continue down the pipeline; `Ok(None)` when the action was applied to
    /// the adapter and swallowed.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] when the call's argument list does not fit
    /// the named method. This is a programming error in the dispatching
    /// code; it surfaces synchronously to the dispatch caller.
    pub fn process<A: StoreAction>(&self, action: A) -> Result<Option<A>, RouterError> {
        match action.as_history_call() {
            Some(call) => {
                self.apply_call(call)?;
                Ok(None)
            }
            None => Ok(Some(action)),
        }
    }

    /// Invoke the named adapter method with the call's arguments.
    fn apply_call(&self, call: &HistoryMethodCall) -> Result<(), RouterError> {
        tracing::debug!(method = %call.method, "applying history call");
        match call.method {
            HistoryMethod::Push => {
                let path = path_arg(call)?;
                self.history.push(path, call.args.get(1).cloned());
            }
            HistoryMethod::Replace => {
                let path = path_arg(call)?;
                self.history.replace(path, call.args.get(1).cloned());
            }
            HistoryMethod::Go => self.history.go(delta_arg(call)?),
            HistoryMethod::GoBack => self.history.go_back(),
            HistoryMethod::GoForward => self.history.go_forward(),
        }
        Ok(())
    }
}

/// Extract the path argument at position 0.
fn path_arg(call: &HistoryMethodCall) -> Result<&str, RouterError> {
    match call.args.first() {
        Some(Value::String(path)) => Ok(path),
        Some(other) => Err(RouterError::InvalidArg {
            method: call.method,
            expected: "path string",
            index: 0,
            got: other.clone(),
        }),
        None => Err(RouterError::MissingArg {
            method: call.method,
            expected: "path string",
            index: 0,
        }),
    }
}

/// Extract the signed delta argument at position 0.
fn delta_arg(call: &HistoryMethodCall) -> Result<isize, RouterError> {
    let value = call.args.first().ok_or(RouterError::MissingArg {
        method: call.method,
        expected: "integer delta",
        index: 0,
    })?;
    value
        .as_i64()
        .and_then(|delta| isize::try_from(delta).ok())
        .ok_or_else(|| RouterError::InvalidArg {
            method: call.method,
            expected: "integer delta",
            index: 0,
            got: value.clone(),
        })
}
