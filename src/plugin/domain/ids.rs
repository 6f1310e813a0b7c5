//! Validated name types for modules and plugins.

use super::PluginDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a module name.
const MAX_MODULE_NAME_LENGTH: usize = 64;

/// Validated application module discriminator, e.g. `form-builder`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Creates a validated module name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_-]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, PluginDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(PluginDomainError::EmptyModuleName);
        }

        let is_valid = normalized.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || character == '_'
                || character == '-'
        });
        if !is_valid {
            return Err(PluginDomainError::InvalidModuleName(normalized));
        }

        if normalized.len() > MAX_MODULE_NAME_LENGTH {
            return Err(PluginDomainError::ModuleNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the module name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleName {
    type Error = PluginDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(value: ModuleName) -> Self {
        value.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Human-readable plugin name used in logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginName(String);

impl PluginName {
    /// Creates a plugin name from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyPluginName`] when the trimmed input
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, PluginDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(PluginDomainError::EmptyPluginName);
        }
        Ok(Self(normalized))
    }

    /// Returns the plugin name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
