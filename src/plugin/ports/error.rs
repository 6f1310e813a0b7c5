//! Error raised by plugin capability implementations.

use std::sync::Arc;
use thiserror::Error;

/// Result type for plugin capability calls.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors returned by plugin implementations.
#[derive(Debug, Clone, Error)]
pub enum PluginError {
    /// The plugin rejected the operation with an explanation.
    #[error("{0}")]
    Rejected(String),

    /// The plugin failed while touching platform state.
    #[error("plugin runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl PluginError {
    /// Creates a rejection with a human-readable reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Wraps a runtime failure from platform collaborators.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
