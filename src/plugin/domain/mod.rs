//! Domain model for registrable platform plugins.
//!
//! Plugins are identified by a capability tag and scoped to the module they
//! extend. Module versions and upgrade windows live here because every other
//! bounded context depends on them.

mod error;
mod ids;
mod kind;
mod version;

pub use error::{ParsePluginKindError, PluginDomainError};
pub use ids::{ModuleName, PluginName};
pub use kind::PluginKind;
pub use version::{ModuleVersion, UpgradeWindow, VersionRange};
