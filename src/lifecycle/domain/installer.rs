//! Payload handed to the remote installer task.

use super::{LocaleCode, TenantId};
use serde::{Deserialize, Serialize};

/// Arguments the installer task needs to provision a module.
///
/// Serialized as `{"data": {"domain", "locale", "tenant"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerPayload {
    data: InstallerArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct InstallerArgs {
    domain: Option<String>,
    locale: LocaleCode,
    tenant: TenantId,
}

impl InstallerPayload {
    /// Creates an installer payload.
    #[must_use]
    pub const fn new(domain: Option<String>, locale: LocaleCode, tenant: TenantId) -> Self {
        Self {
            data: InstallerArgs {
                domain,
                locale,
                tenant,
            },
        }
    }

    /// Returns the public domain the module is installed for.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.data.domain.as_deref()
    }

    /// Returns the locale the installer seeds content for.
    #[must_use]
    pub const fn locale(&self) -> &LocaleCode {
        &self.data.locale
    }

    /// Returns the tenant being installed.
    #[must_use]
    pub const fn tenant(&self) -> &TenantId {
        &self.data.tenant
    }
}
