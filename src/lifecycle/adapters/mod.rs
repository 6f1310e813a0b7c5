//! Adapter implementations for lifecycle ports.

pub mod file;
pub mod memory;

mod records;
