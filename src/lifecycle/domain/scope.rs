//! Request scope and the storage key derived from it.

use super::{LocaleCode, TenantId};
use crate::plugin::domain::ModuleName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tenant, locale and module a lifecycle record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    tenant: TenantId,
    locale: LocaleCode,
    module: ModuleName,
}

impl Scope {
    /// Creates a scope.
    #[must_use]
    pub const fn new(tenant: TenantId, locale: LocaleCode, module: ModuleName) -> Self {
        Self {
            tenant,
            locale,
            module,
        }
    }

    /// Returns the tenant.
    #[must_use]
    pub const fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Returns the content locale.
    #[must_use]
    pub const fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    /// Returns the module discriminator.
    #[must_use]
    pub const fn module(&self) -> &ModuleName {
        &self.module
    }

    /// Returns the composite storage key.
    #[must_use]
    pub fn key(&self) -> ScopeKey {
        ScopeKey {
            partition: format!("T#{}#SYSTEM", self.tenant),
            sort: format!("{}#{}", self.module.as_str().to_ascii_uppercase(), self.locale),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}/{}", self.tenant, self.locale, self.module)
    }
}

/// Composite key uniquely identifying a lifecycle record.
///
/// The partition groups all system records of a tenant; the sort key
/// separates modules and locales within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeKey {
    partition: String,
    sort: String,
}

impl ScopeKey {
    /// Returns the partition key, e.g. `T#root#SYSTEM`.
    #[must_use]
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Returns the sort key, e.g. `FORM-BUILDER#en-US`.
    #[must_use]
    pub fn sort(&self) -> &str {
        &self.sort
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}|{}", self.partition, self.sort)
    }
}
