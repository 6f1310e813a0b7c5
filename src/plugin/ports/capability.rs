//! Narrow capability contracts implemented by plugins.

use super::PluginResult;
use crate::lifecycle::domain::Scope;
use crate::plugin::domain::{ModuleName, ModuleVersion, PluginName, UpgradeWindow};
use async_trait::async_trait;

/// Platform state handed to an upgrade plugin while it migrates a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeContext {
    /// Scope whose module data is being migrated.
    pub scope: Scope,
    /// Version installed before the upgrade.
    pub installed: ModuleVersion,
    /// Version the upgrade produces.
    pub target: ModuleVersion,
    /// Version of the running platform.
    pub deployed: ModuleVersion,
}

/// Migration logic for one version transition of a module.
///
/// Implementations own whatever handles they need to mutate platform state.
/// A returned error aborts the upgrade and leaves the installed version
/// untouched.
#[async_trait]
pub trait UpgradePlugin: Send + Sync {
    /// Returns the plugin name.
    fn name(&self) -> &PluginName;

    /// Returns the module this plugin upgrades.
    fn module(&self) -> &ModuleName;

    /// Returns the transition this plugin performs.
    fn window(&self) -> UpgradeWindow;

    /// Applies the migration.
    async fn apply(&self, context: &UpgradeContext) -> PluginResult<()>;
}

/// Contribution to the request/response schema.
pub trait SchemaExtensionPlugin: Send + Sync {
    /// Returns the plugin name.
    fn name(&self) -> &PluginName;

    /// Returns the module the schema belongs to.
    fn module(&self) -> &ModuleName;

    /// Returns the type definitions added to the schema.
    fn type_defs(&self) -> &str;
}

/// Observer of module lifecycle events.
///
/// Hooks run after the state change they observe has been accepted; their
/// failures are reported but never roll that change back.
#[async_trait]
pub trait LifecycleHookPlugin: Send + Sync {
    /// Returns the plugin name.
    fn name(&self) -> &PluginName;

    /// Returns the module whose lifecycle is observed.
    fn module(&self) -> &ModuleName;

    /// Called once an installation request has been accepted and dispatched.
    async fn install_requested(&self, scope: &Scope) -> PluginResult<()> {
        let _ = scope;
        Ok(())
    }

    /// Called once a new module version has been persisted.
    async fn upgraded(&self, scope: &Scope, version: ModuleVersion) -> PluginResult<()> {
        let _ = (scope, version);
        Ok(())
    }
}
