//! Error types for plugin domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing plugin domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginDomainError {
    /// The module name is empty after trimming.
    #[error("module name must not be empty")]
    EmptyModuleName,

    /// The module name contains characters outside `[a-z0-9_-]`.
    #[error(
        "module name '{0}' contains invalid characters (only lowercase alphanumeric, hyphens and underscores allowed)"
    )]
    InvalidModuleName(String),

    /// The module name exceeds the 64-character limit.
    #[error("module name exceeds 64 character limit: {0}")]
    ModuleNameTooLong(String),

    /// The plugin name is empty after trimming.
    #[error("plugin name must not be empty")]
    EmptyPluginName,

    /// A version string is not in `major.minor.patch` form.
    #[error("invalid version '{0}', expected major.minor.patch")]
    InvalidVersion(String),

    /// A version range has a lower bound that is not below its upper bound.
    #[error("empty version range: {lower} .. {upper}")]
    EmptyVersionRange {
        /// Inclusive lower bound.
        lower: String,
        /// Exclusive upper bound.
        upper: String,
    },
}

/// Error returned while parsing a plugin kind tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown plugin kind: {0}")]
pub struct ParsePluginKindError(pub String);
