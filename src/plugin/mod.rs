//! Plugin registry for module capabilities.
//!
//! Application modules contribute upgrade migrations, schema fragments and
//! lifecycle observers as plugins. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Capability contracts in [`ports`]
//! - Ready-made implementations in [`adapters`]
//! - The registry itself in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
