//! In-memory integration tests for the installation state machine.

use std::sync::Arc;

use modulor::lifecycle::{
    domain::{InstallationFailure, InstallationStatus, LifecycleDomainError, Scope},
    ports::StateStore,
    services::{DISPATCH_FAILED_CODE, InstallationServiceError},
};
use modulor::plugin::domain::ModuleVersion;
use rstest::rstest;
use tokio::sync::Barrier;

use super::helpers::{InstallContext, install_context, install_request, scope, scope_for};

const CONCURRENT_INSTALLS: usize = 8;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn install_then_complete_sets_version(install_context: InstallContext, scope: Scope) {
    install_context
        .coordinator
        .install(install_request(&scope))
        .await
        .expect("install should be accepted");

    let record = install_context
        .coordinator
        .complete_installation(&scope, ModuleVersion::new(5, 0, 0))
        .await
        .expect("completion should be recorded");

    assert_eq!(record.installation().status(), InstallationStatus::Completed);
    assert_eq!(record.version(), Some(ModuleVersion::new(5, 0, 0)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_installs_dispatch_exactly_once(install_context: InstallContext, scope: Scope) {
    let coordinator = Arc::new(install_context.coordinator);
    let barrier = Arc::new(Barrier::new(CONCURRENT_INSTALLS));

    let handles: Vec<_> = (0..CONCURRENT_INSTALLS)
        .map(|_| {
            let task_coordinator = Arc::clone(&coordinator);
            let task_barrier = Arc::clone(&barrier);
            let task_scope = scope.clone();
            tokio::spawn(async move {
                task_barrier.wait().await;
                task_coordinator.install(install_request(&task_scope)).await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.expect("install task should not panic") {
            Ok(_) => accepted += 1,
            Err(InstallationServiceError::AlreadyInProgress(_)) => {}
            Err(other) => panic!("unexpected install error: {other:?}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(
        install_context
            .invoker
            .dispatched()
            .expect("dispatch log")
            .len(),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reinstall_after_failed_installation_is_refused(
    install_context: InstallContext,
    scope: Scope,
) {
    install_context
        .coordinator
        .install(install_request(&scope))
        .await
        .expect("install should be accepted");
    install_context
        .coordinator
        .fail_installation(
            &scope,
            InstallationFailure::new("SEED_FAILED", "seeding aborted").expect("valid failure"),
        )
        .await
        .expect("failure should be recorded");

    let retry = install_context.coordinator.install(install_request(&scope)).await;

    let err = retry.expect_err("a failed installation blocks new attempts");
    assert_eq!(err.code(), "ALREADY_INSTALLED");
    assert!(matches!(
        err,
        InstallationServiceError::AlreadyInstalled {
            status: InstallationStatus::Error,
            ..
        }
    ));
    assert_eq!(
        install_context
            .invoker
            .dispatched()
            .expect("dispatch log")
            .len(),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scopes_are_tracked_independently(install_context: InstallContext) {
    let root = scope_for("root");
    let acme = scope_for("acme");

    install_context
        .coordinator
        .install(install_request(&root))
        .await
        .expect("root install should be accepted");
    install_context
        .coordinator
        .install(install_request(&acme))
        .await
        .expect("acme install should be accepted");

    let dispatched = install_context.invoker.dispatched().expect("dispatch log");
    let tenants: Vec<_> = dispatched
        .iter()
        .map(|task| task.request.payload["data"]["tenant"].clone())
        .collect();
    assert_eq!(tenants, vec!["root", "acme"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_outage_leaves_record_in_error(install_context: InstallContext, scope: Scope) {
    install_context
        .invoker
        .set_unavailable("queue offline")
        .expect("configure outage");

    let result = install_context.coordinator.install(install_request(&scope)).await;

    assert_eq!(
        result.expect_err("dispatch should fail").code(),
        DISPATCH_FAILED_CODE
    );
    let record = install_context
        .store
        .get(&scope)
        .await
        .expect("read should succeed")
        .expect("record should exist");
    assert_eq!(record.installation().status(), InstallationStatus::Error);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_completed_installation_is_rejected(install_context: InstallContext, scope: Scope) {
    super::helpers::installed_at(&install_context, &scope, ModuleVersion::new(5, 0, 0)).await;

    let result = install_context
        .coordinator
        .fail_installation(
            &scope,
            InstallationFailure::new("LATE", "too late").expect("valid failure"),
        )
        .await;

    assert!(matches!(
        result,
        Err(InstallationServiceError::Domain(
            LifecycleDomainError::InvalidInstallationTransition { .. }
        ))
    ));
}
