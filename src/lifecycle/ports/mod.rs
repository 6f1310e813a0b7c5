//! Port contracts for module lifecycle orchestration.

mod identity;
mod invoker;
mod planner;
mod scope;
mod state_store;

pub use identity::IdentityProvider;
pub use invoker::{InvocationRequest, Invoker, InvokerError, InvokerResult};
pub use planner::{UpgradeQuery, VersionPlanner};
pub use scope::ScopeResolver;
pub use state_store::{InstallationClaim, StateStore, StateStoreError, StateStoreResult};
