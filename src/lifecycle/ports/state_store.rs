//! Persistence port for lifecycle records.

use crate::lifecycle::domain::{LifecycleDomainError, LifecycleRecord, RecordPatch, Scope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for state store operations.
pub type StateStoreResult<T> = Result<T, StateStoreError>;

/// Outcome of an atomic installation claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationClaim {
    /// The record was created or moved to `pending` by this call.
    Claimed(LifecycleRecord),
    /// The existing record does not accept a new attempt; it is returned
    /// unchanged.
    Conflict(LifecycleRecord),
}

/// Persistence contract for lifecycle records, one per scope.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the record for a scope.
    async fn get(&self, scope: &Scope) -> StateStoreResult<Option<LifecycleRecord>>;

    /// Merges a patch into the record for a scope, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Rejected`] when the merged record would
    /// break a lifecycle invariant; nothing is written in that case.
    async fn merge_set(
        &self,
        scope: &Scope,
        patch: RecordPatch,
        at: DateTime<Utc>,
    ) -> StateStoreResult<LifecycleRecord>;

    /// Atomically claims a new installation attempt.
    ///
    /// Creates the record in `pending` when absent, moves a `completed`
    /// record to `pending`, and otherwise reports a conflict without
    /// writing. Check and write must not interleave with other writers.
    async fn claim_installation(
        &self,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> StateStoreResult<InstallationClaim>;
}

/// Errors returned by state store implementations.
#[derive(Debug, Clone, Error)]
pub enum StateStoreError {
    /// The write would violate a lifecycle invariant.
    #[error(transparent)]
    Rejected(#[from] LifecycleDomainError),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted lifecycle data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StateStoreError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
