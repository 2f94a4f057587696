//! coverage-sync: TestRail to Jira coverage and pass-rate aggregation
//!
//! A time-boxed, resumable batch job. Each invocation walks TestRail
//! projects from a persisted cursor, aggregates plan and run counts per
//! milestone, fans the resulting percentages out to the Jira issues the
//! milestone references, and publishes the mean of every sample collected
//! during the current cycle.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Adapters** (`adapters`): TestRail and Jira HTTP clients, `SQLite` state store
//! - **Service Layer** (`services`): pagination, aggregation, publishing, the run loop
//! - **Application Layer** (`application`): wiring and scheduling
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use application::ScheduledTask;
pub use domain::models::{Checkpoint, Config, IssuePercentages, Metrics, PercentagePair, SyncSettings};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{InvocationResponse, RunReport, SyncJob};
