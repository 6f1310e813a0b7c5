//! Fire-and-forget remote task dispatch port.

use crate::lifecycle::domain::{InvocationId, TaskName};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invoker operations.
pub type InvokerResult<T> = Result<T, InvokerError>;

/// A named remote task and its JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Task to run.
    pub task: TaskName,
    /// Arguments passed to the task.
    pub payload: Value,
}

impl InvocationRequest {
    /// Creates an invocation request.
    #[must_use]
    pub const fn new(task: TaskName, payload: Value) -> Self {
        Self { task, payload }
    }
}

/// Dispatches remote tasks without waiting for them to finish.
///
/// A successful return means the task was accepted for execution. Its result
/// is never reported back through this port.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Dispatches a task and returns its invocation identifier.
    async fn dispatch(&self, request: InvocationRequest) -> InvokerResult<InvocationId>;
}

/// Errors returned by invoker adapters.
#[derive(Debug, Clone, Error)]
pub enum InvokerError {
    /// No task with the given name can be dispatched.
    #[error("unknown remote task: {0}")]
    UnknownTask(TaskName),

    /// The payload could not be encoded.
    #[error("invalid task payload: {0}")]
    InvalidPayload(String),

    /// Transport or runtime failure while dispatching.
    #[error("dispatch error: {0}")]
    Dispatch(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvokerError {
    /// Wraps a dispatch failure.
    pub fn dispatch(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Dispatch(Arc::new(err))
    }
}
