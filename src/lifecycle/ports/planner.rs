//! Upgrade selection port.

use crate::plugin::{domain::ModuleVersion, ports::UpgradePlugin};
use std::sync::Arc;

/// Versions an upgrade decision is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeQuery {
    /// Version of the running platform.
    pub deployed: ModuleVersion,
    /// Version currently installed, absent before the first installation.
    pub installed: Option<ModuleVersion>,
    /// Requested version.
    pub target: ModuleVersion,
}

/// Policy choosing the upgrade plugin for a requested transition.
///
/// Candidates are already restricted to the requesting module and are
/// passed in registration order. Implementations return at most one plugin;
/// `None` means no plugin applies and callers must not guess.
pub trait VersionPlanner: Send + Sync {
    /// Selects the single applicable plugin.
    fn select_upgrade(
        &self,
        query: UpgradeQuery,
        candidates: &[Arc<dyn UpgradePlugin>],
    ) -> Option<Arc<dyn UpgradePlugin>>;
}
