//! Recording invoker adapter for deterministic tests and local runs.

use crate::lifecycle::{
    domain::InvocationId,
    ports::{InvocationRequest, Invoker, InvokerError, InvokerResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// A dispatch captured by [`RecordingInvoker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedTask {
    /// Identifier returned to the caller.
    pub id: InvocationId,
    /// The dispatched request.
    pub request: InvocationRequest,
}

/// Invoker that records dispatches instead of running them.
///
/// Nothing is executed; tests drive the installer side explicitly and then
/// observe the lifecycle record, mirroring the polling contract of a real
/// fire-and-forget transport.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvoker {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    dispatched: Vec<DispatchedTask>,
    outage: Option<String>,
}

impl RecordingInvoker {
    /// Creates an invoker that accepts every dispatch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent dispatches fail with the given reason.
    ///
    /// # Errors
    ///
    /// Returns invoker errors when lock acquisition fails.
    pub fn set_unavailable(&self, reason: impl Into<String>) -> InvokerResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| InvokerError::dispatch(std::io::Error::other(err.to_string())))?;
        state.outage = Some(reason.into());
        Ok(())
    }

    /// Returns every accepted dispatch in order.
    ///
    /// # Errors
    ///
    /// Returns invoker errors when lock acquisition fails.
    pub fn dispatched(&self) -> InvokerResult<Vec<DispatchedTask>> {
        let state = self
            .state
            .read()
            .map_err(|err| InvokerError::dispatch(std::io::Error::other(err.to_string())))?;
        Ok(state.dispatched.clone())
    }
}

#[async_trait]
impl Invoker for RecordingInvoker {
    async fn dispatch(&self, request: InvocationRequest) -> InvokerResult<InvocationId> {
        let mut state = self
            .state
            .write()
            .map_err(|err| InvokerError::dispatch(std::io::Error::other(err.to_string())))?;

        if let Some(reason) = &state.outage {
            return Err(InvokerError::dispatch(std::io::Error::other(reason.clone())));
        }

        let id = InvocationId::new();
        tracing::debug!(task = %request.task, invocation = %id, "recorded dispatch");
        state.dispatched.push(DispatchedTask { id, request });
        Ok(id)
    }
}
