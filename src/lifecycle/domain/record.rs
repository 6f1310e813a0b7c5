//! Lifecycle record aggregate root.

use super::{Installation, InstallationStatus, LifecycleDomainError, Scope, ScopeKey};
use crate::plugin::domain::ModuleVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partial update merged into a lifecycle record.
///
/// Absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    /// New installed version.
    pub version: Option<ModuleVersion>,
    /// New installation state.
    pub installation: Option<Installation>,
}

impl RecordPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the installed version.
    #[must_use]
    pub const fn with_version(mut self, version: ModuleVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the installation state.
    #[must_use]
    pub fn with_installation(mut self, installation: Installation) -> Self {
        self.installation = Some(installation);
        self
    }
}

/// Persisted installation and version state of a module within one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleRecord {
    scope: Scope,
    version: Option<ModuleVersion>,
    installation: Installation,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LifecycleRecord {
    /// Creates a record whose installation has not started.
    #[must_use]
    pub const fn new(scope: Scope, created_at: DateTime<Utc>) -> Self {
        Self {
            scope,
            version: None,
            installation: Installation::not_started(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the composite storage key.
    #[must_use]
    pub fn key(&self) -> ScopeKey {
        self.scope.key()
    }

    /// Returns the installed version, absent until the first installation
    /// completes.
    #[must_use]
    pub const fn version(&self) -> Option<ModuleVersion> {
        self.version
    }

    /// Returns the installation state.
    #[must_use]
    pub const fn installation(&self) -> &Installation {
        &self.installation
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether a new installation attempt may be claimed.
    #[must_use]
    pub const fn accepts_installation(&self) -> bool {
        self.installation.status().accepts_new_attempt()
    }

    /// Moves the record into `pending` for a new installation attempt.
    ///
    /// A freshly created record may start its first attempt; whether an
    /// already persisted record may do so is decided by
    /// [`LifecycleRecord::accepts_installation`].
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::InvalidInstallationTransition`] when the
    /// current status cannot move to `pending`.
    pub fn begin_installation(&mut self, at: DateTime<Utc>) -> Result<(), LifecycleDomainError> {
        self.apply(RecordPatch::new().with_installation(Installation::pending()), at)
    }

    /// Merges a patch into the record.
    ///
    /// The patch is validated as a whole before anything changes: the
    /// installation transition must be allowed and the version must not move
    /// backwards.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::InvalidInstallationTransition`] or
    /// [`LifecycleDomainError::VersionRegression`].
    pub fn apply(
        &mut self,
        patch: RecordPatch,
        at: DateTime<Utc>,
    ) -> Result<(), LifecycleDomainError> {
        if let Some(installation) = &patch.installation {
            let target = installation.status();
            if !self.installation.status().can_transition_to(target) {
                return Err(self.invalid_transition(target));
            }
        }

        if let (Some(requested), Some(current)) = (patch.version, self.version)
            && requested < current
        {
            return Err(LifecycleDomainError::VersionRegression {
                scope: self.key(),
                current: current.to_string(),
                requested: requested.to_string(),
            });
        }

        if let Some(installation) = patch.installation {
            self.installation = installation;
        }
        if let Some(version) = patch.version {
            self.version = Some(version);
        }
        self.updated_at = at;
        Ok(())
    }

    fn invalid_transition(&self, target: InstallationStatus) -> LifecycleDomainError {
        LifecycleDomainError::InvalidInstallationTransition {
            scope: self.key(),
            from: self.installation.status().as_str().to_owned(),
            to: target.as_str().to_owned(),
        }
    }
}
