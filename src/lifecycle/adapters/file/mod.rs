//! JSON file backed lifecycle record store.
//!
//! All records live in one JSON document inside a capability-scoped
//! directory. Every read-modify-write cycle runs under an exclusive advisory
//! lock on a sibling lock file, so separate store instances and separate
//! processes sharing the directory observe each other's writes. Writes go to
//! a uniquely named scratch file that is renamed over the document.

use crate::lifecycle::{
    adapters::records::{RecordMap, claim_record, merge_record},
    domain::{LifecycleRecord, RecordPatch, Scope},
    ports::{InstallationClaim, StateStore, StateStoreError, StateStoreResult},
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use fd_lock::RwLock;
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::sync::Arc;
use uuid::Uuid;

/// Name of the record document inside the store directory.
const DOCUMENT_NAME: &str = "lifecycle.json";
/// Name of the advisory lock file guarding the document.
const LOCK_NAME: &str = "lifecycle.lock";

/// State store persisting records as JSON on the local filesystem.
#[derive(Clone)]
pub struct JsonFileStateStore {
    dir: Arc<Dir>,
}

impl fmt::Debug for JsonFileStateStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JsonFileStateStore")
            .finish_non_exhaustive()
    }
}

impl JsonFileStateStore {
    /// Opens the store rooted at `path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> StateStoreResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(StateStoreError::persistence)?;
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(StateStoreError::persistence)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    /// Returns every stored record ordered by key.
    ///
    /// Blocks while another writer holds the document lock.
    ///
    /// # Errors
    ///
    /// Returns persistence or decoding errors.
    pub fn records(&self) -> StateStoreResult<Vec<LifecycleRecord>> {
        Ok(self.read_records()?.into_values().collect())
    }

    fn lock_file(&self) -> StateStoreResult<RwLock<File>> {
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(false);
        let file = self
            .dir
            .open_with(LOCK_NAME, &options)
            .map_err(StateStoreError::persistence)?;
        Ok(RwLock::new(file.into_std()))
    }

    fn read_records(&self) -> StateStoreResult<RecordMap> {
        let lock = self.lock_file()?;
        let _guard = lock.read().map_err(StateStoreError::persistence)?;
        self.load()
    }

    /// Applies `change` to the document under the exclusive lock. The
    /// document is rewritten only when `change` reports it as modified.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut RecordMap) -> StateStoreResult<(T, bool)>,
    ) -> StateStoreResult<T> {
        let mut lock = self.lock_file()?;
        let _guard = lock.write().map_err(StateStoreError::persistence)?;
        let mut records = self.load()?;
        let (outcome, modified) = change(&mut records)?;
        if modified {
            self.save(&records)?;
        }
        Ok(outcome)
    }

    /// Runs a blocking store operation off the async worker threads.
    async fn blocking<T>(
        &self,
        operation: impl FnOnce(&Self) -> StateStoreResult<T> + Send + 'static,
    ) -> StateStoreResult<T>
    where
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || operation(&store))
            .await
            .map_err(StateStoreError::persistence)?
    }

    fn load(&self) -> StateStoreResult<RecordMap> {
        let contents = match self.dir.read_to_string(DOCUMENT_NAME) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RecordMap::new()),
            Err(err) => return Err(StateStoreError::persistence(err)),
        };
        let records: Vec<LifecycleRecord> =
            serde_json::from_str(&contents).map_err(StateStoreError::invalid_persisted_data)?;
        Ok(records
            .into_iter()
            .map(|record| (record.key(), record))
            .collect())
    }

    fn save(&self, records: &RecordMap) -> StateStoreResult<()> {
        let ordered: Vec<&LifecycleRecord> = records.values().collect();
        let contents =
            serde_json::to_string_pretty(&ordered).map_err(StateStoreError::persistence)?;
        let scratch = format!("{DOCUMENT_NAME}.{}.tmp", Uuid::new_v4());
        self.dir
            .write(&scratch, contents)
            .map_err(StateStoreError::persistence)?;
        self.dir
            .rename(&scratch, &self.dir, DOCUMENT_NAME)
            .map_err(|err| {
                if let Err(cleanup) = self.dir.remove_file(&scratch) {
                    tracing::warn!(error = %cleanup, "failed to remove scratch file");
                }
                StateStoreError::persistence(err)
            })
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn get(&self, scope: &Scope) -> StateStoreResult<Option<LifecycleRecord>> {
        let key = scope.key();
        self.blocking(move |store| Ok(store.read_records()?.remove(&key)))
            .await
    }

    async fn merge_set(
        &self,
        scope: &Scope,
        patch: RecordPatch,
        at: DateTime<Utc>,
    ) -> StateStoreResult<LifecycleRecord> {
        let target = scope.clone();
        self.blocking(move |store| {
            store.update(|records| Ok((merge_record(records, &target, patch, at)?, true)))
        })
        .await
    }

    async fn claim_installation(
        &self,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> StateStoreResult<InstallationClaim> {
        let target = scope.clone();
        self.blocking(move |store| {
            store.update(|records| {
                let claim = claim_record(records, &target, at)?;
                let claimed = matches!(claim, InstallationClaim::Claimed(_));
                Ok((claim, claimed))
            })
        })
        .await
    }
}
