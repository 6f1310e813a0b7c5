//! Default upgrade selection policy.

use crate::lifecycle::ports::{UpgradeQuery, VersionPlanner};
use crate::plugin::ports::UpgradePlugin;
use std::sync::Arc;

/// Selects the one plugin whose window covers exactly the requested
/// transition.
///
/// A candidate qualifies when it produces the target version, accepts the
/// installed version, and depends on no more than the deployed platform
/// version. The target itself must not be ahead of the platform. Zero or
/// several qualifying candidates yield no selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTransitionPlanner;

impl ExactTransitionPlanner {
    /// Creates the planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl VersionPlanner for ExactTransitionPlanner {
    fn select_upgrade(
        &self,
        query: UpgradeQuery,
        candidates: &[Arc<dyn UpgradePlugin>],
    ) -> Option<Arc<dyn UpgradePlugin>> {
        let installed = query.installed?;
        if query.target > query.deployed {
            return None;
        }

        let mut qualifying = candidates.iter().filter(|candidate| {
            candidate
                .window()
                .covers(installed, query.target, query.deployed)
        });

        let selected = qualifying.next()?;
        if let Some(ambiguous) = qualifying.next() {
            tracing::warn!(
                first = %selected.name(),
                second = %ambiguous.name(),
                target = %query.target,
                "several upgrade plugins match; refusing to choose"
            );
            return None;
        }
        Some(Arc::clone(selected))
    }
}
