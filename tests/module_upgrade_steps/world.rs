//! Shared world state for module upgrade BDD scenarios.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use modulor::lifecycle::{
    adapters::memory::{InMemoryStateStore, RecordingInvoker, StaticIdentityProvider},
    domain::{LocaleCode, Scope, TaskName, TenantId},
    services::{
        ExactTransitionPlanner, InstallationCoordinator, UpgradeOrchestrator, UpgradeServiceError,
    },
};
use modulor::plugin::{
    domain::{ModuleName, ModuleVersion},
    services::PluginRegistry,
};
use rstest::fixture;

/// Coordinator type used to seed installed modules.
pub type TestCoordinator =
    InstallationCoordinator<InMemoryStateStore, RecordingInvoker, DefaultClock>;

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = UpgradeOrchestrator<
    InMemoryStateStore,
    StaticIdentityProvider,
    ExactTransitionPlanner,
    DefaultClock,
>;

/// Platform version every scenario runs against.
pub const DEPLOYED: ModuleVersion = ModuleVersion::new(5, 0, 0);

/// Scenario world for module upgrade behaviour tests.
pub struct UpgradeWorld {
    /// Shared record store.
    pub store: Arc<InMemoryStateStore>,
    /// Coordinator used by the installation steps.
    pub coordinator: TestCoordinator,
    /// Plugins registered so far.
    pub registry: PluginRegistry,
    /// Caller identity for the upgrade.
    pub identity: StaticIdentityProvider,
    /// Result of the last upgrade attempt.
    pub last_result: Option<Result<ModuleVersion, UpgradeServiceError>>,
}

impl UpgradeWorld {
    /// Creates a world over an empty store with an anonymous caller.
    ///
    /// # Errors
    ///
    /// Returns an error when the fixed installer task name is rejected.
    pub fn new() -> Result<Self, eyre::Report> {
        let store = Arc::new(InMemoryStateStore::new());
        let coordinator = InstallationCoordinator::new(
            Arc::clone(&store),
            Arc::new(RecordingInvoker::new()),
            Arc::new(DefaultClock),
            Arc::new(PluginRegistry::new()),
            TaskName::new("fb-installer").wrap_err("valid installer task expected")?,
        );
        Ok(Self {
            store,
            coordinator,
            registry: PluginRegistry::new(),
            identity: StaticIdentityProvider::anonymous(),
            last_result: None,
        })
    }

    /// Builds an orchestrator from the plugins and identity gathered so far.
    pub fn orchestrator(&self) -> TestOrchestrator {
        UpgradeOrchestrator::new(
            Arc::clone(&self.store),
            Arc::new(self.identity.clone()),
            Arc::new(ExactTransitionPlanner::new()),
            Arc::new(DefaultClock),
            Arc::new(self.registry.clone()),
            DEPLOYED,
        )
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> UpgradeWorld {
    UpgradeWorld::new().expect("scenario world should build")
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Module every scenario upgrades.
pub fn module() -> Result<ModuleName, eyre::Report> {
    ModuleName::new("form_builder").wrap_err("valid module expected")
}

/// Scope every scenario works on.
pub fn scope() -> Result<Scope, eyre::Report> {
    Ok(Scope::new(
        TenantId::new("root").wrap_err("valid tenant expected")?,
        LocaleCode::new("en-US").wrap_err("valid locale expected")?,
        module()?,
    ))
}

/// Parses a version written in a feature file.
pub fn version(raw: &str) -> Result<ModuleVersion, eyre::Report> {
    ModuleVersion::parse(raw).wrap_err_with(|| format!("'{raw}' should be a version"))
}
