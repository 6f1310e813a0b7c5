//! Module version values and upgrade applicability windows.

use super::PluginDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

/// Semantic version of a module or of the deployed platform.
///
/// Only the `major.minor.patch` core is modelled; ordering is numeric per
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleVersion {
    major: u64,
    minor: u64,
    patch: u64,
}

impl ModuleVersion {
    /// Creates a version from its numeric components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a `major.minor.patch` string.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::InvalidVersion`] when the input does not
    /// have exactly three numeric components.
    pub fn parse(value: &str) -> Result<Self, PluginDomainError> {
        let trimmed = value.trim();
        let invalid = || PluginDomainError::InvalidVersion(trimmed.to_owned());

        let mut components = trimmed.split('.').map(|part| {
            if part.is_empty() || !part.chars().all(|character| character.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        });

        let major = components.next().ok_or_else(&invalid)??;
        let minor = components.next().ok_or_else(&invalid)??;
        let patch = components.next().ok_or_else(&invalid)??;
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(self) -> u64 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.minor
    }

    /// Returns the patch component.
    #[must_use]
    pub const fn patch(self) -> u64 {
        self.patch
    }
}

impl FromStr for ModuleVersion {
    type Err = PluginDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ModuleVersion {
    type Error = PluginDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModuleVersion> for String {
    fn from(value: ModuleVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Range of installed versions with an inclusive lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    lower: ModuleVersion,
    upper: Bound<ModuleVersion>,
}

impl VersionRange {
    /// Matches exactly one version.
    #[must_use]
    pub const fn exactly(version: ModuleVersion) -> Self {
        Self {
            lower: version,
            upper: Bound::Included(version),
        }
    }

    /// Matches every version at or above `lower`.
    #[must_use]
    pub const fn at_least(lower: ModuleVersion) -> Self {
        Self {
            lower,
            upper: Bound::Unbounded,
        }
    }

    /// Matches versions in `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyVersionRange`] when `lower` is not
    /// strictly below `upper`.
    pub fn between(lower: ModuleVersion, upper: ModuleVersion) -> Result<Self, PluginDomainError> {
        if lower >= upper {
            return Err(PluginDomainError::EmptyVersionRange {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        Ok(Self {
            lower,
            upper: Bound::Excluded(upper),
        })
    }

    /// Returns whether `version` falls inside the range.
    #[must_use]
    pub fn contains(&self, version: ModuleVersion) -> bool {
        (Bound::Included(self.lower), self.upper).contains(&version)
    }
}

/// Transition an upgrade plugin is able to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeWindow {
    from: VersionRange,
    to: ModuleVersion,
    requires_platform: ModuleVersion,
}

impl UpgradeWindow {
    /// Creates a window upgrading any installed version in `from` to `to`.
    ///
    /// The platform is required to be at least `to` unless overridden with
    /// [`UpgradeWindow::requiring_platform`].
    #[must_use]
    pub const fn new(from: VersionRange, to: ModuleVersion) -> Self {
        Self {
            from,
            to,
            requires_platform: to,
        }
    }

    /// Sets the minimum deployed platform version the migration depends on.
    #[must_use]
    pub const fn requiring_platform(mut self, version: ModuleVersion) -> Self {
        self.requires_platform = version;
        self
    }

    /// Returns the accepted installed versions.
    #[must_use]
    pub const fn installed_range(&self) -> VersionRange {
        self.from
    }

    /// Returns the version produced by the upgrade.
    #[must_use]
    pub const fn to(&self) -> ModuleVersion {
        self.to
    }

    /// Returns the minimum deployed platform version.
    #[must_use]
    pub const fn requires_platform(&self) -> ModuleVersion {
        self.requires_platform
    }

    /// Returns whether the window covers `installed -> target` on a platform
    /// running `deployed`.
    #[must_use]
    pub fn covers(
        &self,
        installed: ModuleVersion,
        target: ModuleVersion,
        deployed: ModuleVersion,
    ) -> bool {
        self.to == target
            && installed < target
            && self.from.contains(installed)
            && self.requires_platform <= deployed
    }
}
