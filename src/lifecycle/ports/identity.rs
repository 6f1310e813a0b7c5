//! Authentication port.

use crate::lifecycle::domain::Identity;
use async_trait::async_trait;

/// Source of the authenticated identity of the current request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the current identity, or `None` for anonymous callers.
    async fn current_identity(&self) -> Option<Identity>;
}
