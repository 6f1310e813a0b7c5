//! In-memory integration tests for upgrade planning and execution.

use std::sync::Arc;

use modulor::lifecycle::{
    adapters::memory::StaticIdentityProvider,
    domain::Scope,
    ports::StateStoreError,
    services::{UpgradeRequest, UpgradeServiceError},
};
use modulor::plugin::{
    adapters::FnUpgradePlugin,
    domain::{ModuleName, ModuleVersion, UpgradeWindow, VersionRange},
    ports::PluginError,
    services::{Plugin, PluginRegistry},
};
use rstest::rstest;

use super::helpers::{
    DEPLOYED, InstallContext, MockStore, install_context, installed_at, migration, orchestrator,
    orchestrator_as, scope, stored_version,
};

const V1_0: ModuleVersion = ModuleVersion::new(1, 0, 0);
const V1_1: ModuleVersion = ModuleVersion::new(1, 1, 0);
const V1_2: ModuleVersion = ModuleVersion::new(1, 2, 0);

fn chained_registry() -> PluginRegistry {
    PluginRegistry::new()
        .with_plugin(migration("to-1.1", V1_0, V1_1, Ok(())))
        .with_plugin(migration("to-1.2", V1_1, V1_2, Ok(())))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upgrades_follow_plugin_chain(install_context: InstallContext, scope: Scope) {
    installed_at(&install_context, &scope, V1_0).await;
    let orchestrator = orchestrator(Arc::clone(&install_context.store), chained_registry());

    for target in [V1_1, V1_2] {
        let version = orchestrator
            .upgrade(UpgradeRequest::new(scope.clone(), target))
            .await
            .expect("upgrade should succeed");
        assert_eq!(version, target);
    }

    assert_eq!(stored_version(&*install_context.store, &scope).await, Some(V1_2));
}

#[rstest]
#[case::skipping_a_version(V1_2)]
#[case::same_version(V1_0)]
#[case::downgrade(ModuleVersion::new(0, 9, 0))]
#[case::ahead_of_platform(ModuleVersion::new(6, 0, 0))]
#[tokio::test(flavor = "multi_thread")]
async fn unplanned_targets_leave_version_untouched(
    install_context: InstallContext,
    scope: Scope,
    #[case] target: ModuleVersion,
) {
    installed_at(&install_context, &scope, V1_0).await;
    let orchestrator = orchestrator(Arc::clone(&install_context.store), chained_registry());

    let result = orchestrator
        .upgrade(UpgradeRequest::new(scope.clone(), target))
        .await;

    assert!(matches!(
        result,
        Err(UpgradeServiceError::NoApplicablePlugin { .. })
    ));
    assert_eq!(stored_version(&*install_context.store, &scope).await, Some(V1_0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plugins_of_other_modules_are_ignored(install_context: InstallContext, scope: Scope) {
    installed_at(&install_context, &scope, V1_0).await;
    let foreign = FnUpgradePlugin::new(
        "pb-to-1.1",
        ModuleName::new("page_builder").expect("valid module"),
        UpgradeWindow::new(VersionRange::exactly(V1_0), V1_1),
        |_| Ok(()),
    )
    .expect("valid plugin");
    let orchestrator = orchestrator(
        Arc::clone(&install_context.store),
        PluginRegistry::new().with_plugin(Plugin::upgrade(foreign)),
    );

    let result = orchestrator
        .upgrade(UpgradeRequest::new(scope.clone(), V1_1))
        .await;

    assert!(matches!(
        result,
        Err(UpgradeServiceError::NoApplicablePlugin { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plugin_requiring_newer_platform_is_skipped(install_context: InstallContext, scope: Scope) {
    installed_at(&install_context, &scope, V1_0).await;
    let demanding = FnUpgradePlugin::new(
        "to-1.1",
        super::helpers::module(),
        UpgradeWindow::new(VersionRange::exactly(V1_0), V1_1)
            .requiring_platform(ModuleVersion::new(6, 0, 0)),
        |_| Ok(()),
    )
    .expect("valid plugin");
    let orchestrator = orchestrator(
        Arc::clone(&install_context.store),
        PluginRegistry::new().with_plugin(Plugin::upgrade(demanding)),
    );

    let result = orchestrator.upgrade(UpgradeRequest::new(scope, V1_1)).await;

    assert_eq!(
        result.expect_err("platform is too old").code(),
        "NO_APPLICABLE_PLUGIN"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_migration_keeps_previous_version(install_context: InstallContext, scope: Scope) {
    installed_at(&install_context, &scope, V1_0).await;
    let registry = PluginRegistry::new().with_plugin(migration(
        "to-1.1",
        V1_0,
        V1_1,
        Err(PluginError::rejected("column rename failed")),
    ));
    let orchestrator = orchestrator(Arc::clone(&install_context.store), registry);

    let result = orchestrator
        .upgrade(UpgradeRequest::new(scope.clone(), V1_1))
        .await;

    assert!(matches!(
        result,
        Err(UpgradeServiceError::UpgradeFailed { .. })
    ));
    assert_eq!(stored_version(&*install_context.store, &scope).await, Some(V1_0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_upgrade_never_touches_store(scope: Scope) {
    let mut store = MockStore::new();
    store.expect_get().never();
    store.expect_merge_set().never();
    let orchestrator = orchestrator_as(
        Arc::new(store),
        chained_registry(),
        StaticIdentityProvider::anonymous(),
    );

    let result = orchestrator.upgrade(UpgradeRequest::new(scope, V1_1)).await;

    assert!(matches!(result, Err(UpgradeServiceError::NotAuthorized)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreadable_store_is_reported(scope: Scope) {
    let mut store = MockStore::new();
    store.expect_get().times(1).returning(|_| {
        Err(StateStoreError::persistence(std::io::Error::other(
            "connection reset",
        )))
    });
    store.expect_merge_set().never();
    let orchestrator = orchestrator(Arc::new(store), chained_registry());

    let result = orchestrator.upgrade(UpgradeRequest::new(scope, V1_1)).await;

    assert_eq!(
        result.expect_err("store is down").code(),
        "STORE_UNAVAILABLE"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deployed_version_is_exposed(install_context: InstallContext) {
    let orchestrator = orchestrator(Arc::clone(&install_context.store), PluginRegistry::new());

    assert_eq!(orchestrator.deployed(), DEPLOYED);
}
