//! In-memory adapters for lifecycle ports.

mod context;
mod invoker;
mod state_store;

pub use context::{FixedScopeResolver, StaticIdentityProvider};
pub use invoker::{DispatchedTask, RecordingInvoker};
pub use state_store::InMemoryStateStore;
