//! Domain layer for the coverage sync job
//!
//! This module contains the pure business logic: metric calculation,
//! refs parsing, checkpoint accumulation and the port traits that
//! adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
