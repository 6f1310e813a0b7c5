//! Domain model for module installation and version state.
//!
//! A lifecycle record tracks, per tenant, locale and module, which version
//! is installed and how far the latest installation attempt has progressed.
//! Infrastructure concerns remain outside this boundary.

mod error;
mod identity;
mod ids;
mod installation;
mod installer;
mod record;
mod scope;

pub use error::{LifecycleDomainError, ParseInstallationStatusError};
pub use identity::Identity;
pub use ids::{InvocationId, LocaleCode, TaskName, TenantId};
pub use installation::{Installation, InstallationFailure, InstallationStatus};
pub use installer::InstallerPayload;
pub use record::{LifecycleRecord, RecordPatch};
pub use scope::{Scope, ScopeKey};
