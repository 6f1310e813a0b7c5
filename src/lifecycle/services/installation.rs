//! Service layer driving the module installation state machine.

use crate::lifecycle::{
    domain::{
        Installation, InstallationFailure, InstallationStatus, InstallerPayload, InvocationId,
        LifecycleDomainError, LifecycleRecord, LocaleCode, RecordPatch, Scope, ScopeKey, TaskName,
    },
    ports::{
        InstallationClaim, InvocationRequest, Invoker, InvokerError, StateStore, StateStoreError,
    },
};
use crate::plugin::{domain::ModuleVersion, services::PluginRegistry};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Failure code written to the record when the installer cannot be reached.
pub const DISPATCH_FAILED_CODE: &str = "DISPATCH_FAILED";

/// Request payload for installing a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRequest {
    /// Scope to install into.
    pub scope: Scope,
    /// Public domain the module is served under, if known.
    pub domain: Option<String>,
    /// Platform default locale seeded by the installer.
    pub default_locale: LocaleCode,
}

impl InstallationRequest {
    /// Creates an installation request.
    #[must_use]
    pub const fn new(scope: Scope, domain: Option<String>, default_locale: LocaleCode) -> Self {
        Self {
            scope,
            domain,
            default_locale,
        }
    }
}

/// Acknowledgement that an installation was accepted and dispatched.
///
/// The installation itself is still running; callers observe its outcome by
/// reading the lifecycle record again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationAccepted {
    /// Identifier of the dispatched installer task.
    pub invocation: InvocationId,
    /// Record as claimed, in `pending`.
    pub record: LifecycleRecord,
}

/// Service-level errors for installation operations.
#[derive(Debug, Clone, Error)]
pub enum InstallationServiceError {
    /// An installation for the scope is still pending.
    #[error("installation of {0} is already in progress")]
    AlreadyInProgress(ScopeKey),

    /// A record exists that does not accept a new attempt.
    #[error("{scope} is already installed (status {status})")]
    AlreadyInstalled {
        /// Scope of the existing record.
        scope: ScopeKey,
        /// Status that blocked the attempt.
        status: InstallationStatus,
    },

    /// The state store could not be read or written.
    #[error("state store unavailable: {0}")]
    StoreUnavailable(StateStoreError),

    /// The installer task could not be dispatched.
    #[error("installer dispatch failed: {0}")]
    DispatchFailed(#[source] InvokerError),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] LifecycleDomainError),
}

impl InstallationServiceError {
    /// Returns the stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AlreadyInProgress(_) => "INSTALL_IN_PROGRESS",
            Self::AlreadyInstalled { .. } => "ALREADY_INSTALLED",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::DispatchFailed(_) => DISPATCH_FAILED_CODE,
            Self::Domain(_) => "INVALID_INPUT",
        }
    }
}

impl From<StateStoreError> for InstallationServiceError {
    fn from(err: StateStoreError) -> Self {
        match err {
            StateStoreError::Rejected(domain) => Self::Domain(domain),
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Result type for installation service operations.
pub type InstallationServiceResult<T> = Result<T, InstallationServiceError>;

/// Coordinates module installation across the state store and invoker.
#[derive(Clone)]
pub struct InstallationCoordinator<S, V, C>
where
    S: StateStore,
    V: Invoker,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    invoker: Arc<V>,
    clock: Arc<C>,
    registry: Arc<PluginRegistry>,
    installer: TaskName,
}

impl<S, V, C> InstallationCoordinator<S, V, C>
where
    S: StateStore,
    V: Invoker,
    C: Clock + Send + Sync,
{
    /// Creates a new coordinator dispatching `installer` for every accepted
    /// installation.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        invoker: Arc<V>,
        clock: Arc<C>,
        registry: Arc<PluginRegistry>,
        installer: TaskName,
    ) -> Self {
        Self {
            store,
            invoker,
            clock,
            registry,
            installer,
        }
    }

    /// Requests installation of a module.
    ///
    /// Returns as soon as the installer task has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationServiceError::AlreadyInProgress`] while an
    /// attempt is pending, [`InstallationServiceError::AlreadyInstalled`]
    /// when the existing record is in any other state except `completed`,
    /// [`InstallationServiceError::StoreUnavailable`] on store failures and
    /// [`InstallationServiceError::DispatchFailed`] when the installer cannot
    /// be reached. In the last case the record is left in `error`.
    #[instrument(skip_all, fields(scope = %request.scope))]
    pub async fn install(
        &self,
        request: InstallationRequest,
    ) -> InstallationServiceResult<InstallationAccepted> {
        let InstallationRequest {
            scope,
            domain,
            default_locale,
        } = request;

        if let Some(existing) = self.store.get(&scope).await? {
            ensure_accepts_installation(&existing)?;
        }

        let record = match self
            .store
            .claim_installation(&scope, self.clock.utc())
            .await?
        {
            InstallationClaim::Claimed(record) => record,
            InstallationClaim::Conflict(existing) => {
                tracing::debug!("installation claim lost a race");
                ensure_accepts_installation(&existing)?;
                return Err(InstallationServiceError::AlreadyInstalled {
                    scope: existing.key(),
                    status: existing.installation().status(),
                });
            }
        };

        let payload = InstallerPayload::new(domain, default_locale, scope.tenant().clone());
        let invocation = match self.dispatch_installer(&payload).await {
            Ok(invocation) => invocation,
            Err(err) => return Err(self.record_dispatch_failure(&scope, err).await),
        };
        tracing::info!(%invocation, task = %self.installer, "installer dispatched");

        for hook in self.registry.lifecycle_hooks_for(scope.module()) {
            if let Err(err) = hook.install_requested(&scope).await {
                tracing::warn!(hook = %hook.name(), error = %err, "install hook failed");
            }
        }

        Ok(InstallationAccepted { invocation, record })
    }

    /// Marks a pending installation as finished and records its version.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationServiceError::Domain`] when the record is not
    /// `pending` or the version would move backwards, and
    /// [`InstallationServiceError::StoreUnavailable`] on store failures.
    #[instrument(skip_all, fields(scope = %scope, %version))]
    pub async fn complete_installation(
        &self,
        scope: &Scope,
        version: ModuleVersion,
    ) -> InstallationServiceResult<LifecycleRecord> {
        let patch = RecordPatch::new()
            .with_installation(Installation::completed())
            .with_version(version);
        let record = self.store.merge_set(scope, patch, self.clock.utc()).await?;
        tracing::info!("installation completed");
        Ok(record)
    }

    /// Marks a pending installation as failed.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationServiceError::Domain`] when the record is not
    /// `pending`, and [`InstallationServiceError::StoreUnavailable`] on store
    /// failures.
    #[instrument(skip_all, fields(scope = %scope, code = failure.code()))]
    pub async fn fail_installation(
        &self,
        scope: &Scope,
        failure: InstallationFailure,
    ) -> InstallationServiceResult<LifecycleRecord> {
        let patch = RecordPatch::new().with_installation(Installation::failed(failure));
        let record = self.store.merge_set(scope, patch, self.clock.utc()).await?;
        tracing::info!("installation failed");
        Ok(record)
    }

    async fn dispatch_installer(
        &self,
        payload: &InstallerPayload,
    ) -> Result<InvocationId, InvokerError> {
        let value = serde_json::to_value(payload)
            .map_err(|err| InvokerError::InvalidPayload(err.to_string()))?;
        self.invoker
            .dispatch(InvocationRequest::new(self.installer.clone(), value))
            .await
    }

    async fn record_dispatch_failure(
        &self,
        scope: &Scope,
        err: InvokerError,
    ) -> InstallationServiceError {
        tracing::error!(error = %err, "installer dispatch failed");
        if let Err(store_err) = self.persist_dispatch_failure(scope, &err).await {
            tracing::error!(error = %store_err, "could not record dispatch failure");
        }
        InstallationServiceError::DispatchFailed(err)
    }

    async fn persist_dispatch_failure(
        &self,
        scope: &Scope,
        err: &InvokerError,
    ) -> Result<LifecycleRecord, StateStoreError> {
        let failure = InstallationFailure::new(DISPATCH_FAILED_CODE, err.to_string())?;
        let patch = RecordPatch::new().with_installation(Installation::failed(failure));
        self.store.merge_set(scope, patch, self.clock.utc()).await
    }
}

fn ensure_accepts_installation(record: &LifecycleRecord) -> InstallationServiceResult<()> {
    match record.installation().status() {
        InstallationStatus::Completed => Ok(()),
        InstallationStatus::Pending => Err(InstallationServiceError::AlreadyInProgress(
            record.key(),
        )),
        status @ (InstallationStatus::NotStarted | InstallationStatus::Error) => {
            Err(InstallationServiceError::AlreadyInstalled {
                scope: record.key(),
                status,
            })
        }
    }
}
