//! Plugin catalog shared by lifecycle services.

mod registry;

pub use registry::{Plugin, PluginRegistry};
