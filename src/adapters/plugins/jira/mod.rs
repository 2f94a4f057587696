//! Jira Cloud native adapter.
//!
//! Egress only: writes averaged coverage and pass-rate values into two
//! custom fields of an issue.

pub mod client;
pub mod models;

pub use client::JiraClient;
