//! In-memory integration tests for the query and mutation facade.

use std::sync::Arc;

use mockable::DefaultClock;
use modulor::api::{BooleanResponse, SCOPE_UNRESOLVED_CODE, SystemApi};
use modulor::lifecycle::{
    adapters::memory::{
        FixedScopeResolver, InMemoryStateStore, RecordingInvoker, StaticIdentityProvider,
    },
    domain::{Identity, InstallationStatus, LocaleCode, TaskName, TenantId},
    ports::{StateStore, StateStoreError},
    services::{ExactTransitionPlanner, InstallationCoordinator, UpgradeOrchestrator},
};
use modulor::plugin::{domain::ModuleVersion, services::PluginRegistry};
use rstest::rstest;

use super::helpers::{DEPLOYED, MockStore, locale, migration, module};

type TestApi<S> = SystemApi<
    S,
    RecordingInvoker,
    StaticIdentityProvider,
    ExactTransitionPlanner,
    DefaultClock,
    FixedScopeResolver,
>;

fn resolver() -> FixedScopeResolver {
    FixedScopeResolver::new(TenantId::new("root").expect("valid tenant"), locale())
}

fn api<S: StateStore>(
    store: Arc<S>,
    scope_resolver: FixedScopeResolver,
    identity: StaticIdentityProvider,
    plugins: PluginRegistry,
) -> TestApi<S> {
    let registry = Arc::new(plugins);
    let clock = Arc::new(DefaultClock);
    let installation = InstallationCoordinator::new(
        Arc::clone(&store),
        Arc::new(RecordingInvoker::new()),
        Arc::clone(&clock),
        Arc::clone(&registry),
        TaskName::new("fb-installer").expect("valid task"),
    );
    let upgrade = UpgradeOrchestrator::new(
        Arc::clone(&store),
        Arc::new(identity),
        Arc::new(ExactTransitionPlanner::new()),
        clock,
        Arc::clone(&registry),
        DEPLOYED,
    );
    SystemApi::new(
        store,
        Arc::new(scope_resolver),
        registry,
        module(),
        installation,
        upgrade,
    )
}

fn admin() -> StaticIdentityProvider {
    StaticIdentityProvider::authenticated(Identity::new("admin"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_through_facade() {
    let v1 = ModuleVersion::new(1, 0, 0);
    let v2 = ModuleVersion::new(1, 1, 0);
    let api = api(
        Arc::new(InMemoryStateStore::new()),
        resolver(),
        admin(),
        PluginRegistry::new().with_plugin(migration("to-1.1", v1, v2, Ok(()))),
    );

    assert_eq!(api.install(Some("https://example.com".to_owned())).await, BooleanResponse::ok());
    let scope = api.scope().expect("scope should resolve");
    api.installation()
        .complete_installation(&scope, v1)
        .await
        .expect("completion should be recorded");
    assert_eq!(api.upgrade("1.1.0").await, BooleanResponse::ok());

    let view = api.system().await.expect("system state");
    assert_eq!(view.version, Some(v2));
    assert_eq!(view.installation.status(), InstallationStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_install_reports_in_progress_code() {
    let api = api(
        Arc::new(InMemoryStateStore::new()),
        resolver(),
        admin(),
        PluginRegistry::new(),
    );
    assert_eq!(api.install(None).await, BooleanResponse::ok());

    let response = api.install(None).await;

    assert_eq!(response.data, None);
    assert_eq!(response.error_code(), Some("INSTALL_IN_PROGRESS"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_upgrade_reports_not_authorized() {
    let api = api(
        Arc::new(InMemoryStateStore::new()),
        resolver(),
        StaticIdentityProvider::anonymous(),
        PluginRegistry::new(),
    );

    assert_eq!(
        api.upgrade("1.1.0").await.error_code(),
        Some("NOT_AUTHORIZED")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unresolved_scope_yields_no_system_state() {
    let mut store = MockStore::new();
    store.expect_get().never();
    store.expect_claim_installation().never();
    let api = api(
        Arc::new(store),
        FixedScopeResolver::unresolved(locale()),
        admin(),
        PluginRegistry::new(),
    );

    assert_eq!(api.system().await, None);
    assert_eq!(
        api.install(None).await.error_code(),
        Some(SCOPE_UNRESOLVED_CODE)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_failure_is_swallowed_by_system_query() {
    let mut store = MockStore::new();
    store.expect_get().returning(|_| {
        Err(StateStoreError::persistence(std::io::Error::other(
            "table missing",
        )))
    });
    let api = api(Arc::new(store), resolver(), admin(), PluginRegistry::new());

    assert_eq!(api.system().await, None);
    assert_eq!(
        api.install(None).await.error_code(),
        Some("STORE_UNAVAILABLE")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn content_locale_selects_separate_record() {
    let store = Arc::new(InMemoryStateStore::new());
    let english = api(Arc::clone(&store), resolver(), admin(), PluginRegistry::new());
    let german = api(
        Arc::clone(&store),
        resolver().with_locale(LocaleCode::new("de-DE").expect("valid locale")),
        admin(),
        PluginRegistry::new(),
    );

    assert_eq!(english.install(None).await, BooleanResponse::ok());

    assert_eq!(german.system().await, None);
    assert_eq!(store.records().expect("list records").len(), 1);
}
