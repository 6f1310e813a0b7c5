//! Transport-agnostic facade over the lifecycle services.
//!
//! Requests are scoped through a [`ScopeResolver`]: the tenant and content
//! locale of the caller together with the configured module name select the
//! lifecycle record every operation works on.

use super::{BooleanResponse, ErrorResponse};
use crate::lifecycle::{
    domain::{Installation, LifecycleRecord, Scope},
    ports::{IdentityProvider, Invoker, ScopeResolver, StateStore, VersionPlanner},
    services::{InstallationCoordinator, InstallationRequest, UpgradeOrchestrator, UpgradeRequest},
};
use crate::plugin::{
    domain::{ModuleName, ModuleVersion},
    services::PluginRegistry,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Error code returned when the request has no tenant or locale.
pub const SCOPE_UNRESOLVED_CODE: &str = "SCOPE_UNRESOLVED";
/// Error code returned for malformed arguments.
pub const INVALID_INPUT_CODE: &str = "INVALID_INPUT";

/// Installed version and installation state as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemView {
    /// Installed version, absent before the first completed installation.
    pub version: Option<ModuleVersion>,
    /// Installation state.
    pub installation: Installation,
}

impl From<&LifecycleRecord> for SystemView {
    fn from(record: &LifecycleRecord) -> Self {
        Self {
            version: record.version(),
            installation: record.installation().clone(),
        }
    }
}

/// Query and mutation entry points for one application module.
pub struct SystemApi<S, V, I, P, C, R>
where
    S: StateStore,
    V: Invoker,
    I: IdentityProvider,
    P: VersionPlanner,
    C: Clock + Send + Sync,
    R: ScopeResolver,
{
    store: Arc<S>,
    resolver: Arc<R>,
    registry: Arc<PluginRegistry>,
    module: ModuleName,
    installation: InstallationCoordinator<S, V, C>,
    upgrade: UpgradeOrchestrator<S, I, P, C>,
}

impl<S, V, I, P, C, R> SystemApi<S, V, I, P, C, R>
where
    S: StateStore,
    V: Invoker,
    I: IdentityProvider,
    P: VersionPlanner,
    C: Clock + Send + Sync,
    R: ScopeResolver,
{
    /// Creates the facade. `store` must be the store both services use.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        resolver: Arc<R>,
        registry: Arc<PluginRegistry>,
        module: ModuleName,
        installation: InstallationCoordinator<S, V, C>,
        upgrade: UpgradeOrchestrator<S, I, P, C>,
    ) -> Self {
        Self {
            store,
            resolver,
            registry,
            module,
            installation,
            upgrade,
        }
    }

    /// Returns the installation coordinator.
    #[must_use]
    pub const fn installation(&self) -> &InstallationCoordinator<S, V, C> {
        &self.installation
    }

    /// Resolves the scope of the current request.
    ///
    /// Returns `None` when the tenant or the content locale is unknown.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        let tenant = self.resolver.current_tenant()?;
        let locale = self.resolver.current_locale()?;
        Some(Scope::new(tenant, locale, self.module.clone()))
    }

    /// Reads the installed version and installation state.
    ///
    /// Never fails: an unresolvable scope, a missing record and store
    /// failures all yield `None`, the latter being logged.
    #[instrument(skip_all, fields(module = %self.module))]
    pub async fn system(&self) -> Option<SystemView> {
        let Some(scope) = self.scope() else {
            tracing::debug!("scope unresolved; no system state");
            return None;
        };
        self.store.get(&scope).await.map_or_else(
            |err| {
                tracing::error!(%scope, error = %err, "failed to read lifecycle record");
                None
            },
            |record| record.as_ref().map(SystemView::from),
        )
    }

    /// Requests installation of the module for the current scope.
    pub async fn install(&self, domain: Option<String>) -> BooleanResponse {
        let Some(scope) = self.scope() else {
            return scope_unresolved();
        };
        let request = InstallationRequest::new(scope, domain, self.resolver.default_locale());
        self.installation.install(request).await.map_or_else(
            |err| BooleanResponse::failed(ErrorResponse::from(&err)),
            |_| BooleanResponse::ok(),
        )
    }

    /// Upgrades the module of the current scope to `version`.
    ///
    /// Anonymous callers are refused before the version or the scope is
    /// looked at.
    pub async fn upgrade(&self, version: &str) -> BooleanResponse {
        if let Err(err) = self.upgrade.authorize().await {
            return BooleanResponse::failed(ErrorResponse::from(&err));
        }
        let target = match ModuleVersion::parse(version) {
            Ok(target) => target,
            Err(err) => {
                return BooleanResponse::failed(ErrorResponse::new(
                    INVALID_INPUT_CODE,
                    err.to_string(),
                ));
            }
        };
        let Some(scope) = self.scope() else {
            return scope_unresolved();
        };
        self.upgrade
            .upgrade(UpgradeRequest::new(scope, target))
            .await
            .map_or_else(
                |err| BooleanResponse::failed(ErrorResponse::from(&err)),
                |_| BooleanResponse::ok(),
            )
    }

    /// Concatenates the type definitions of every schema extension in
    /// registration order.
    #[must_use]
    pub fn schema_type_defs(&self) -> String {
        self.registry
            .schema_extensions()
            .iter()
            .map(|extension| extension.type_defs().trim().to_owned())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn scope_unresolved() -> BooleanResponse {
    BooleanResponse::failed(ErrorResponse::new(
        SCOPE_UNRESOLVED_CODE,
        "request has no tenant or content locale",
    ))
}
