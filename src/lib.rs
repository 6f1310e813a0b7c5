//! Modulor: application lifecycle orchestration for modular platforms.
//!
//! Independently deployable application modules register capabilities as
//! plugins, track their installation and version state per tenant and
//! locale, and are upgraded in place by version-scoped migration plugins.
//!
//! # Architecture
//!
//! Modulor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON files)
//!
//! # Modules
//!
//! - [`plugin`]: Plugin capabilities and the registry
//! - [`lifecycle`]: Installation state machine and upgrade orchestration
//! - [`api`]: Query and mutation facade with a serializable response envelope
//! - [`config`]: Environment configuration

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod plugin;
