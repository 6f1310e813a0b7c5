//! Application services for module installation and upgrades.

mod installation;
mod planner;
mod upgrade;

pub use installation::{
    DISPATCH_FAILED_CODE, InstallationAccepted, InstallationCoordinator, InstallationRequest,
    InstallationServiceError, InstallationServiceResult,
};
pub use planner::ExactTransitionPlanner;
pub use upgrade::{
    UpgradeOrchestrator, UpgradeRequest, UpgradeServiceError, UpgradeServiceResult,
};
