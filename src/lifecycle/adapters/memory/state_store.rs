//! In-memory lifecycle record store.

use crate::lifecycle::{
    adapters::records::{RecordMap, claim_record, merge_record},
    domain::{LifecycleRecord, RecordPatch, Scope},
    ports::{InstallationClaim, StateStore, StateStoreError, StateStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory state store.
///
/// Every write, including the installation claim, runs under a single write
/// lock, so concurrent claims on one scope succeed at most once.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    records: Arc<RwLock<RecordMap>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = LifecycleRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.key(), record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    /// Returns every stored record ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Persistence`] when lock acquisition fails.
    pub fn records(&self) -> StateStoreResult<Vec<LifecycleRecord>> {
        let records = self.records.read().map_err(|err| {
            StateStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(records.values().cloned().collect())
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, scope: &Scope) -> StateStoreResult<Option<LifecycleRecord>> {
        let records = self.records.read().map_err(|err| {
            StateStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(records.get(&scope.key()).cloned())
    }

    async fn merge_set(
        &self,
        scope: &Scope,
        patch: RecordPatch,
        at: DateTime<Utc>,
    ) -> StateStoreResult<LifecycleRecord> {
        let mut records = self.records.write().map_err(|err| {
            StateStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        merge_record(&mut records, scope, patch, at)
    }

    async fn claim_installation(
        &self,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> StateStoreResult<InstallationClaim> {
        let mut records = self.records.write().map_err(|err| {
            StateStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        claim_record(&mut records, scope, at)
    }
}
