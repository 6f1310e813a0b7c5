//! Environment configuration for the lifecycle orchestrator.

use crate::lifecycle::domain::TaskName;
use crate::plugin::domain::{ModuleName, ModuleVersion};
use std::time::Duration;
use thiserror::Error;

/// Variable naming the remote installer task.
pub const INSTALLATION_HANDLER_VAR: &str = "INSTALLATION_HANDLER";
/// Variable holding the deployed platform version.
pub const PLATFORM_VERSION_VAR: &str = "PLATFORM_VERSION";
/// Variable overriding the module discriminator.
pub const MODULE_NAME_VAR: &str = "MODULE_NAME";
/// Variable holding the default upgrade timeout in seconds.
pub const UPGRADE_TIMEOUT_VAR: &str = "UPGRADE_TIMEOUT_SECS";

/// Module discriminator used when [`MODULE_NAME_VAR`] is unset.
pub const DEFAULT_MODULE_NAME: &str = "form_builder";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("{name} is invalid: {reason}")]
    Invalid {
        /// Offending variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Invalid {
            name,
            reason: err.to_string(),
        }
    }
}

/// Validated orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Remote task dispatched for installations.
    pub installer: TaskName,
    /// Version of the running platform.
    pub platform_version: ModuleVersion,
    /// Module whose lifecycle is managed.
    pub module: ModuleName,
    /// Upgrade timeout applied when a request sets none.
    pub upgrade_timeout: Option<Duration>,
}

impl OrchestratorConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or any
    /// value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or any
    /// value fails validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| read(name).ok_or(ConfigError::Missing(name));

        let installer = TaskName::new(require(INSTALLATION_HANDLER_VAR)?)
            .map_err(|err| ConfigError::invalid(INSTALLATION_HANDLER_VAR, err))?;
        let platform_version = ModuleVersion::parse(&require(PLATFORM_VERSION_VAR)?)
            .map_err(|err| ConfigError::invalid(PLATFORM_VERSION_VAR, err))?;
        let module = ModuleName::new(
            read(MODULE_NAME_VAR).unwrap_or_else(|| DEFAULT_MODULE_NAME.to_owned()),
        )
        .map_err(|err| ConfigError::invalid(MODULE_NAME_VAR, err))?;
        let upgrade_timeout = read(UPGRADE_TIMEOUT_VAR)
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|err| ConfigError::invalid(UPGRADE_TIMEOUT_VAR, err))
            })
            .transpose()?;

        Ok(Self {
            installer,
            platform_version,
            module,
            upgrade_timeout,
        })
    }
}
