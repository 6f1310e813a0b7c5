//! Error types for lifecycle domain validation and parsing.

use super::ScopeKey;
use thiserror::Error;

/// Errors returned while constructing or transitioning lifecycle values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleDomainError {
    /// The tenant identifier is empty after trimming.
    #[error("tenant identifier must not be empty")]
    EmptyTenantId,

    /// The locale code is not a BCP 47 style tag such as `en-US`.
    #[error("invalid locale code '{0}'")]
    InvalidLocaleCode(String),

    /// The remote task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// An installation failure was reported without a code.
    #[error("installation failure code must not be empty")]
    EmptyFailureCode,

    /// Moving between two installation states is not allowed.
    #[error("invalid installation transition for {scope}: {from} -> {to}")]
    InvalidInstallationTransition {
        /// Record being transitioned.
        scope: ScopeKey,
        /// Current installation status.
        from: String,
        /// Requested installation status.
        to: String,
    },

    /// A version write would move the installed version backwards.
    #[error("version of {scope} cannot move from {current} to {requested}")]
    VersionRegression {
        /// Record being updated.
        scope: ScopeKey,
        /// Currently installed version.
        current: String,
        /// Rejected version.
        requested: String,
    },
}

/// Error returned while parsing installation status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown installation status: {0}")]
pub struct ParseInstallationStatusError(pub String);
