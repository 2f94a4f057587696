pub mod checkpoint;
pub mod config;
pub mod metrics;
pub mod project;
pub mod settings;

pub use checkpoint::{Checkpoint, IssuePercentages};
pub use config::{Config, DatabaseConfig, JiraConfig, JobConfig, LoggingConfig, TestRailConfig};
pub use metrics::{calculate_metrics, Metrics, PercentagePair};
pub use project::{parse_refs, Milestone, Project};
pub use settings::SyncSettings;
