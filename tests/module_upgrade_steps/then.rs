//! Then steps for module upgrade BDD scenarios.

use super::world::{UpgradeWorld, run_async, scope, version};
use eyre::{WrapErr, eyre};
use modulor::lifecycle::ports::StateStore;
use rstest_bdd_macros::then;

#[then("the upgrade succeeds")]
fn upgrade_succeeds(world: &UpgradeWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(eyre!("upgrade failed: {err}")),
        None => Err(eyre!("no upgrade was requested")),
    }
}

#[then(r#"the upgrade fails with code "{code}""#)]
fn upgrade_fails_with(world: &UpgradeWorld, code: String) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) if err.code() == code => Ok(()),
        Some(Err(err)) => Err(eyre!("expected {code}, got {}: {err}", err.code())),
        Some(Ok(reached)) => Err(eyre!("expected {code}, upgrade reached {reached}")),
        None => Err(eyre!("no upgrade was requested")),
    }
}

#[then(r#"the installed version is "{expected}""#)]
fn installed_version_is(world: &UpgradeWorld, expected: String) -> Result<(), eyre::Report> {
    let record = run_async(world.store.get(&scope()?))
        .wrap_err("lifecycle record should be readable")?
        .ok_or_else(|| eyre!("module should have a lifecycle record"))?;
    let wanted = version(&expected)?;
    if record.version() != Some(wanted) {
        return Err(eyre!("expected version {wanted}, got {:?}", record.version()));
    }
    Ok(())
}
