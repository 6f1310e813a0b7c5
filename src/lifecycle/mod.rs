//! Installation and version lifecycle of application modules.
//!
//! Each module keeps one lifecycle record per tenant and locale. Installing
//! claims that record and hands the work to a remote installer task;
//! upgrading selects a single migration plugin and persists the new version
//! once it succeeds. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
