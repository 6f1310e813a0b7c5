//! Service layer applying version upgrades to installed modules.

use crate::lifecycle::{
    domain::{Identity, LifecycleDomainError, RecordPatch, Scope, ScopeKey},
    ports::{IdentityProvider, StateStore, StateStoreError, UpgradeQuery, VersionPlanner},
};
use crate::plugin::{
    domain::{ModuleVersion, PluginName},
    ports::{PluginError, UpgradeContext},
    services::PluginRegistry,
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Request payload for upgrading a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    /// Scope whose module is upgraded.
    pub scope: Scope,
    /// Requested version.
    pub target: ModuleVersion,
    /// Upper bound on plugin execution; falls back to the orchestrator
    /// default.
    pub timeout: Option<Duration>,
}

impl UpgradeRequest {
    /// Creates an upgrade request without an explicit timeout.
    #[must_use]
    pub const fn new(scope: Scope, target: ModuleVersion) -> Self {
        Self {
            scope,
            target,
            timeout: None,
        }
    }

    /// Bounds plugin execution.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Service-level errors for upgrade operations.
#[derive(Debug, Clone, Error)]
pub enum UpgradeServiceError {
    /// The caller is not authenticated.
    #[error("upgrade requires an authenticated identity")]
    NotAuthorized,

    /// No single upgrade plugin covers the requested transition.
    #[error("no upgrade plugin applies to {scope} for target {target}")]
    NoApplicablePlugin {
        /// Scope being upgraded.
        scope: ScopeKey,
        /// Requested version.
        target: ModuleVersion,
    },

    /// The selected plugin returned an error.
    #[error("upgrade plugin {plugin} failed: {source}")]
    UpgradeFailed {
        /// Plugin that failed.
        plugin: PluginName,
        /// Error reported by the plugin.
        #[source]
        source: PluginError,
    },

    /// The selected plugin did not finish in time.
    #[error("upgrade plugin {plugin} did not finish within {after:?}")]
    UpgradeTimeout {
        /// Plugin that timed out.
        plugin: PluginName,
        /// Time limit that elapsed.
        after: Duration,
    },

    /// The state store could not be read or written.
    #[error("state store unavailable: {0}")]
    StoreUnavailable(StateStoreError),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] LifecycleDomainError),
}

impl UpgradeServiceError {
    /// Returns the stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::NoApplicablePlugin { .. } => "NO_APPLICABLE_PLUGIN",
            Self::UpgradeFailed { .. } => "UPGRADE_FAILED",
            Self::UpgradeTimeout { .. } => "UPGRADE_TIMEOUT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Domain(_) => "INVALID_INPUT",
        }
    }
}

impl From<StateStoreError> for UpgradeServiceError {
    fn from(err: StateStoreError) -> Self {
        match err {
            StateStoreError::Rejected(domain) => Self::Domain(domain),
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Result type for upgrade service operations.
pub type UpgradeServiceResult<T> = Result<T, UpgradeServiceError>;

/// Authorizes, plans, applies and persists module upgrades.
#[derive(Clone)]
pub struct UpgradeOrchestrator<S, I, P, C>
where
    S: StateStore,
    I: IdentityProvider,
    P: VersionPlanner,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    identity: Arc<I>,
    planner: Arc<P>,
    clock: Arc<C>,
    registry: Arc<PluginRegistry>,
    deployed: ModuleVersion,
    default_timeout: Option<Duration>,
}

impl<S, I, P, C> UpgradeOrchestrator<S, I, P, C>
where
    S: StateStore,
    I: IdentityProvider,
    P: VersionPlanner,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator for a platform running `deployed`.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        identity: Arc<I>,
        planner: Arc<P>,
        clock: Arc<C>,
        registry: Arc<PluginRegistry>,
        deployed: ModuleVersion,
    ) -> Self {
        Self {
            store,
            identity,
            planner,
            clock,
            registry,
            deployed,
            default_timeout: None,
        }
    }

    /// Bounds plugin execution for requests without their own timeout.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Returns the deployed platform version.
    #[must_use]
    pub const fn deployed(&self) -> ModuleVersion {
        self.deployed
    }

    /// Returns the identity allowed to run upgrades for this request.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeServiceError::NotAuthorized`] for anonymous callers.
    pub async fn authorize(&self) -> UpgradeServiceResult<Identity> {
        self.identity
            .current_identity()
            .await
            .ok_or(UpgradeServiceError::NotAuthorized)
    }

    /// Upgrades a module to the requested version and returns it.
    ///
    /// The version is written only after the selected plugin has been
    /// applied successfully.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeServiceError::NotAuthorized`] for anonymous callers
    /// before any state is read,
    /// [`UpgradeServiceError::NoApplicablePlugin`] when the planner selects
    /// nothing, [`UpgradeServiceError::UpgradeFailed`] or
    /// [`UpgradeServiceError::UpgradeTimeout`] when the plugin does not
    /// succeed, and store errors.
    #[instrument(skip_all, fields(scope = %request.scope, target = %request.target))]
    pub async fn upgrade(&self, request: UpgradeRequest) -> UpgradeServiceResult<ModuleVersion> {
        let UpgradeRequest {
            scope,
            target,
            timeout,
        } = request;

        let identity = self.authorize().await?;
        tracing::debug!(actor = identity.id(), "upgrade authorized");

        let installed = self
            .store
            .get(&scope)
            .await?
            .and_then(|record| record.version());
        let candidates = self.registry.upgrades_for(scope.module());
        let query = UpgradeQuery {
            deployed: self.deployed,
            installed,
            target,
        };
        let no_plugin = || UpgradeServiceError::NoApplicablePlugin {
            scope: scope.key(),
            target,
        };
        let plugin = self
            .planner
            .select_upgrade(query, &candidates)
            .ok_or_else(no_plugin)?;
        let context = UpgradeContext {
            scope: scope.clone(),
            installed: installed.ok_or_else(no_plugin)?,
            target,
            deployed: self.deployed,
        };

        let plugin_name = plugin.name().clone();
        let outcome = match timeout.or(self.default_timeout) {
            Some(limit) => tokio::time::timeout(limit, plugin.apply(&context))
                .await
                .map_err(|_| UpgradeServiceError::UpgradeTimeout {
                    plugin: plugin_name.clone(),
                    after: limit,
                })?,
            None => plugin.apply(&context).await,
        };
        outcome.map_err(|source| UpgradeServiceError::UpgradeFailed {
            plugin: plugin_name.clone(),
            source,
        })?;

        let record = self
            .store
            .merge_set(
                &scope,
                RecordPatch::new().with_version(target),
                self.clock.utc(),
            )
            .await?;
        tracing::info!(plugin = %plugin_name, from = %context.installed, "module upgraded");

        for hook in self.registry.lifecycle_hooks_for(scope.module()) {
            if let Err(err) = hook.upgraded(&scope, target).await {
                tracing::warn!(hook = %hook.name(), error = %err, "upgrade hook failed");
            }
        }

        Ok(record.version().unwrap_or(target))
    }
}
