//! Fixed request-context adapters for identity and scope.

use crate::lifecycle::{
    domain::{Identity, LocaleCode, TenantId},
    ports::{IdentityProvider, ScopeResolver},
};
use async_trait::async_trait;

/// Identity provider returning a preconfigured identity.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    /// Provider for an authenticated caller.
    #[must_use]
    pub const fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Provider for an anonymous caller.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

/// Scope resolver with fixed tenant and locales.
#[derive(Debug, Clone)]
pub struct FixedScopeResolver {
    tenant: Option<TenantId>,
    locale: Option<LocaleCode>,
    default_locale: LocaleCode,
}

impl FixedScopeResolver {
    /// Creates a resolver whose content locale equals the default locale.
    #[must_use]
    pub fn new(tenant: TenantId, default_locale: LocaleCode) -> Self {
        Self {
            tenant: Some(tenant),
            locale: Some(default_locale.clone()),
            default_locale,
        }
    }

    /// Creates a resolver for a request without tenant or locale.
    #[must_use]
    pub const fn unresolved(default_locale: LocaleCode) -> Self {
        Self {
            tenant: None,
            locale: None,
            default_locale,
        }
    }

    /// Overrides the content locale.
    #[must_use]
    pub fn with_locale(mut self, locale: LocaleCode) -> Self {
        self.locale = Some(locale);
        self
    }
}

impl ScopeResolver for FixedScopeResolver {
    fn current_tenant(&self) -> Option<TenantId> {
        self.tenant.clone()
    }

    fn current_locale(&self) -> Option<LocaleCode> {
        self.locale.clone()
    }

    fn default_locale(&self) -> LocaleCode {
        self.default_locale.clone()
    }
}
