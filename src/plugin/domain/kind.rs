//! Capability tags used for registry lookup.

use super::ParsePluginKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator identifying which capability a plugin provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginKind {
    /// Migrates a module from one version to the next.
    Upgrade,
    /// Contributes type definitions to the request/response schema.
    SchemaExtension,
    /// Observes module lifecycle events.
    LifecycleHook,
}

impl PluginKind {
    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upgrade => "upgrade",
            Self::SchemaExtension => "schema-extension",
            Self::LifecycleHook => "lifecycle-hook",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PluginKind {
    type Error = ParsePluginKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "upgrade" => Ok(Self::Upgrade),
            "schema-extension" => Ok(Self::SchemaExtension),
            "lifecycle-hook" => Ok(Self::LifecycleHook),
            _ => Err(ParsePluginKindError(value.to_owned())),
        }
    }
}
