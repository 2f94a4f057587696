//! TestRail native adapter.
//!
//! Read-only integration with the TestRail REST API v2. The client
//! enforces a fixed minimum spacing between requests so one job stays
//! under TestRail's per-minute request ceiling.

pub mod client;

pub use client::{RequestSpacer, TestRailClient};
