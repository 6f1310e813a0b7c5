//! Request scope resolution port.

use crate::lifecycle::domain::{LocaleCode, TenantId};

/// Resolves tenancy and locale information of the current request.
pub trait ScopeResolver: Send + Sync {
    /// Returns the tenant the request runs for, if any.
    fn current_tenant(&self) -> Option<TenantId>;

    /// Returns the content locale of the request, if any.
    fn current_locale(&self) -> Option<LocaleCode>;

    /// Returns the platform default locale.
    fn default_locale(&self) -> LocaleCode;
}
