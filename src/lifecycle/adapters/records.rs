//! Merge and claim rules shared by the bundled state store adapters.
//!
//! Callers must hold exclusive access to `records` for the duration of each
//! call; that is what makes the claim atomic.

use crate::lifecycle::{
    domain::{LifecycleRecord, RecordPatch, Scope, ScopeKey},
    ports::{InstallationClaim, StateStoreResult},
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub(super) type RecordMap = BTreeMap<ScopeKey, LifecycleRecord>;

pub(super) fn merge_record(
    records: &mut RecordMap,
    scope: &Scope,
    patch: RecordPatch,
    at: DateTime<Utc>,
) -> StateStoreResult<LifecycleRecord> {
    let mut record = records
        .get(&scope.key())
        .cloned()
        .unwrap_or_else(|| LifecycleRecord::new(scope.clone(), at));
    record.apply(patch, at)?;
    records.insert(record.key(), record.clone());
    Ok(record)
}

pub(super) fn claim_record(
    records: &mut RecordMap,
    scope: &Scope,
    at: DateTime<Utc>,
) -> StateStoreResult<InstallationClaim> {
    let key = scope.key();
    let mut record = match records.get(&key) {
        Some(existing) if !existing.accepts_installation() => {
            return Ok(InstallationClaim::Conflict(existing.clone()));
        }
        Some(existing) => existing.clone(),
        None => LifecycleRecord::new(scope.clone(), at),
    };
    record.begin_installation(at)?;
    records.insert(key, record.clone());
    Ok(InstallationClaim::Claimed(record))
}
