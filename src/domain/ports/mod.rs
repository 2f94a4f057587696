//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - TestManagementClient: rate-limited reads from TestRail
//! - IssueTracker: field updates on Jira issues
//! - CheckpointStore / SettingsStore: key-value persistence
//!
//! Services depend only on these traits so they can be exercised with
//! in-memory fakes.

pub mod checkpoint_store;
pub mod issue_tracker;
pub mod test_management;

pub use checkpoint_store::{CheckpointStore, SettingsStore};
pub use issue_tracker::IssueTracker;
pub use test_management::TestManagementClient;
