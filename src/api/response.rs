//! Serializable response envelope shared by every mutation.

use crate::lifecycle::services::{InstallationServiceError, UpgradeServiceError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error carried by a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Structured details, if any.
    #[serde(default)]
    pub data: Option<Value>,
}

impl ErrorResponse {
    /// Creates an error without details.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&InstallationServiceError> for ErrorResponse {
    fn from(err: &InstallationServiceError) -> Self {
        let response = Self::new(err.code(), err.to_string());
        match err {
            InstallationServiceError::AlreadyInstalled { status, .. } => {
                response.with_data(json!({ "status": status }))
            }
            InstallationServiceError::AlreadyInProgress(_)
            | InstallationServiceError::StoreUnavailable(_)
            | InstallationServiceError::DispatchFailed(_)
            | InstallationServiceError::Domain(_) => response,
        }
    }
}

impl From<&UpgradeServiceError> for ErrorResponse {
    fn from(err: &UpgradeServiceError) -> Self {
        let response = Self::new(err.code(), err.to_string());
        match err {
            UpgradeServiceError::NoApplicablePlugin { target, .. } => {
                response.with_data(json!({ "target": target }))
            }
            UpgradeServiceError::UpgradeFailed { plugin, .. }
            | UpgradeServiceError::UpgradeTimeout { plugin, .. } => {
                response.with_data(json!({ "plugin": plugin }))
            }
            UpgradeServiceError::NotAuthorized
            | UpgradeServiceError::StoreUnavailable(_)
            | UpgradeServiceError::Domain(_) => response,
        }
    }
}

/// Boolean mutation result: `data` on success, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanResponse {
    /// `true` when the mutation was accepted.
    pub data: Option<bool>,
    /// Failure description.
    pub error: Option<ErrorResponse>,
}

impl BooleanResponse {
    /// Successful response.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            data: Some(true),
            error: None,
        }
    }

    /// Failed response.
    #[must_use]
    pub const fn failed(error: ErrorResponse) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Returns the error code of a failed response.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|error| error.code.as_str())
    }
}
