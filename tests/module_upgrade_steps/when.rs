//! When steps for module upgrade BDD scenarios.

use super::world::{UpgradeWorld, run_async, scope, version};
use modulor::lifecycle::services::UpgradeRequest;
use rstest_bdd_macros::when;

#[when(r#"an upgrade to "{target}" is requested"#)]
fn upgrade_requested(world: &mut UpgradeWorld, target: String) -> Result<(), eyre::Report> {
    let request = UpgradeRequest::new(scope()?, version(&target)?);
    let orchestrator = world.orchestrator();
    world.last_result = Some(run_async(orchestrator.upgrade(request)));
    Ok(())
}
