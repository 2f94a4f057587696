//! Infrastructure adapters for external systems.

pub mod plugins;
pub mod sqlite;
