//! Identifier and validated-name types for lifecycle scopes and tasks.

use super::LifecycleDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a locale code.
const MAX_LOCALE_LENGTH: usize = 35;

/// Identifier of the tenant a request runs for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Creates a tenant identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::EmptyTenantId`] when the trimmed input
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, LifecycleDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(LifecycleDomainError::EmptyTenantId);
        }
        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = LifecycleDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Locale code such as `en-US`.
///
/// Subtags are alphanumeric and separated by hyphens; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Creates a validated locale code.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::InvalidLocaleCode`] when the input is
    /// empty, too long, or contains empty or non-alphanumeric subtags.
    pub fn new(value: impl Into<String>) -> Result<Self, LifecycleDomainError> {
        let normalized = value.into().trim().to_owned();

        let subtags_valid = normalized.split('-').all(|subtag| {
            !subtag.is_empty() && subtag.chars().all(|character| character.is_ascii_alphanumeric())
        });
        if normalized.is_empty() || normalized.len() > MAX_LOCALE_LENGTH || !subtags_valid {
            return Err(LifecycleDomainError::InvalidLocaleCode(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the locale code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocaleCode {
    type Error = LifecycleDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocaleCode> for String {
    fn from(value: LocaleCode) -> Self {
        value.0
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Name of a remote task the invoker can dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(String);

impl TaskName {
    /// Creates a task name.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::EmptyTaskName`] when the trimmed input
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, LifecycleDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(LifecycleDomainError::EmptyTaskName);
        }
        Ok(Self(normalized))
    }

    /// Returns the task name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of one dispatched remote task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Creates a new random invocation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an invocation identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
