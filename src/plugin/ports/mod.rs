//! Capability contracts implemented by registrable plugins.

mod capability;
mod error;

pub use capability::{LifecycleHookPlugin, SchemaExtensionPlugin, UpgradeContext, UpgradePlugin};
pub use error::{PluginError, PluginResult};
