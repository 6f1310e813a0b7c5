//! Shared fixtures for in-memory lifecycle integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use mockable::DefaultClock;
use modulor::lifecycle::{
    adapters::memory::{InMemoryStateStore, RecordingInvoker, StaticIdentityProvider},
    domain::{Identity, LifecycleRecord, LocaleCode, RecordPatch, Scope, TaskName, TenantId},
    ports::{InstallationClaim, StateStore, StateStoreResult},
    services::{
        ExactTransitionPlanner, InstallationCoordinator, InstallationRequest, UpgradeOrchestrator,
    },
};
use modulor::plugin::{
    adapters::FnUpgradePlugin,
    domain::{ModuleName, ModuleVersion, UpgradeWindow, VersionRange},
    ports::PluginResult,
    services::{Plugin, PluginRegistry},
};
use rstest::fixture;

mock! {
    /// State store double for failure injection.
    pub Store {}

    #[async_trait]
    impl StateStore for Store {
        async fn get(&self, scope: &Scope) -> StateStoreResult<Option<LifecycleRecord>>;
        async fn merge_set(
            &self,
            scope: &Scope,
            patch: RecordPatch,
            at: DateTime<Utc>,
        ) -> StateStoreResult<LifecycleRecord>;
        async fn claim_installation(
            &self,
            scope: &Scope,
            at: DateTime<Utc>,
        ) -> StateStoreResult<InstallationClaim>;
    }
}

/// Coordinator wired to in-memory adapters.
pub type TestCoordinator =
    InstallationCoordinator<InMemoryStateStore, RecordingInvoker, DefaultClock>;

/// Orchestrator wired to in-memory adapters.
pub type TestOrchestrator<S = InMemoryStateStore> =
    UpgradeOrchestrator<S, StaticIdentityProvider, ExactTransitionPlanner, DefaultClock>;

/// Platform version used by every orchestrator built here.
pub const DEPLOYED: ModuleVersion = ModuleVersion::new(5, 0, 0);

/// Returns the module under test.
pub fn module() -> ModuleName {
    ModuleName::new("form_builder").expect("valid module")
}

/// Returns the default locale.
pub fn locale() -> LocaleCode {
    LocaleCode::new("en-US").expect("valid locale")
}

/// Returns the scope for a tenant.
pub fn scope_for(tenant: &str) -> Scope {
    Scope::new(TenantId::new(tenant).expect("valid tenant"), locale(), module())
}

/// Returns the root tenant scope.
#[fixture]
pub fn scope() -> Scope {
    scope_for("root")
}

/// Builds an installation request without a public domain.
pub fn install_request(scope: &Scope) -> InstallationRequest {
    InstallationRequest::new(scope.clone(), None, locale())
}

/// Builds an upgrade plugin for one exact transition.
pub fn migration(
    name: &str,
    from: ModuleVersion,
    to: ModuleVersion,
    outcome: PluginResult<()>,
) -> Plugin {
    Plugin::upgrade(
        FnUpgradePlugin::new(
            name,
            module(),
            UpgradeWindow::new(VersionRange::exactly(from), to),
            move |_| outcome.clone(),
        )
        .expect("valid plugin"),
    )
}

/// Installation side of the lifecycle wired to shared adapters.
pub struct InstallContext {
    /// Shared record store.
    pub store: Arc<InMemoryStateStore>,
    /// Recording invoker.
    pub invoker: Arc<RecordingInvoker>,
    /// Coordinator under test.
    pub coordinator: TestCoordinator,
}

/// Provides a coordinator over an empty store.
#[fixture]
pub fn install_context() -> InstallContext {
    let store = Arc::new(InMemoryStateStore::new());
    let invoker = Arc::new(RecordingInvoker::new());
    let coordinator = InstallationCoordinator::new(
        Arc::clone(&store),
        Arc::clone(&invoker),
        Arc::new(DefaultClock),
        Arc::new(PluginRegistry::new()),
        TaskName::new("fb-installer").expect("valid task"),
    );
    InstallContext {
        store,
        invoker,
        coordinator,
    }
}

/// Builds an orchestrator for an authenticated administrator.
pub fn orchestrator<S: StateStore>(store: Arc<S>, registry: PluginRegistry) -> TestOrchestrator<S> {
    orchestrator_as(
        store,
        registry,
        StaticIdentityProvider::authenticated(Identity::new("admin")),
    )
}

/// Builds an orchestrator for a given caller.
pub fn orchestrator_as<S: StateStore>(
    store: Arc<S>,
    registry: PluginRegistry,
    identity: StaticIdentityProvider,
) -> TestOrchestrator<S> {
    UpgradeOrchestrator::new(
        store,
        Arc::new(identity),
        Arc::new(ExactTransitionPlanner::new()),
        Arc::new(DefaultClock),
        Arc::new(registry),
        DEPLOYED,
    )
}

/// Installs and completes the module at `version`.
pub async fn installed_at(context: &InstallContext, scope: &Scope, version: ModuleVersion) {
    context
        .coordinator
        .install(install_request(scope))
        .await
        .expect("install should be accepted");
    context
        .coordinator
        .complete_installation(scope, version)
        .await
        .expect("completion should be recorded");
}

/// Reads the stored version of a scope.
pub async fn stored_version(store: &impl StateStore, scope: &Scope) -> Option<ModuleVersion> {
    store
        .get(scope)
        .await
        .expect("read should succeed")
        .and_then(|record| record.version())
}
