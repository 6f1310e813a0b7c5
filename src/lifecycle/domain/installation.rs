//! Installation status state machine.

use super::{LifecycleDomainError, ParseInstallationStatusError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Progress of a module installation within one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationStatus {
    /// A record exists but no installation has been requested.
    NotStarted,
    /// The installer task has been dispatched and has not reported back.
    Pending,
    /// The installer task finished successfully.
    Completed,
    /// The installer task reported a failure.
    Error,
}

impl InstallationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Returns whether a new installation attempt may start from this state.
    ///
    /// Only `completed` qualifies. `error` is a dead end that needs manual
    /// intervention.
    #[must_use]
    pub const fn accepts_new_attempt(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::NotStarted | Self::Completed, Self::Pending)
                | (Self::Pending, Self::Completed | Self::Error)
        )
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InstallationStatus {
    type Error = ParseInstallationStatusError;

    fn try_from(value: &str) -> Result<Self, ParseInstallationStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            _ => Err(ParseInstallationStatusError(value.to_owned())),
        }
    }
}

/// Machine-readable description of a failed installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationFailure {
    code: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl InstallationFailure {
    /// Creates a failure description.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::EmptyFailureCode`] when the trimmed
    /// code is empty.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, LifecycleDomainError> {
        let normalized = code.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(LifecycleDomainError::EmptyFailureCode);
        }
        Ok(Self {
            code: normalized,
            message: message.into(),
            data: None,
        })
    }

    /// Attaches structured diagnostic data.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the failure code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns attached diagnostic data.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// Installation status together with its failure, if any.
///
/// The failure is present exactly when the status is `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    status: InstallationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<InstallationFailure>,
}

impl Installation {
    /// Installation that has not been requested yet.
    #[must_use]
    pub const fn not_started() -> Self {
        Self {
            status: InstallationStatus::NotStarted,
            error: None,
        }
    }

    /// Installation whose installer task is running.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            status: InstallationStatus::Pending,
            error: None,
        }
    }

    /// Installation that finished successfully.
    #[must_use]
    pub const fn completed() -> Self {
        Self {
            status: InstallationStatus::Completed,
            error: None,
        }
    }

    /// Installation that failed.
    #[must_use]
    pub const fn failed(failure: InstallationFailure) -> Self {
        Self {
            status: InstallationStatus::Error,
            error: Some(failure),
        }
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> InstallationStatus {
        self.status
    }

    /// Returns the failure when the status is `error`.
    #[must_use]
    pub const fn error(&self) -> Option<&InstallationFailure> {
        self.error.as_ref()
    }
}

impl Default for Installation {
    fn default() -> Self {
        Self::not_started()
    }
}
