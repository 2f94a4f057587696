//! Native adapter plugins.
//!
//! Each sub-module corresponds to an external system and implements
//! the domain port traits directly: TestRail for reads, Jira for writes.

pub mod jira;
pub mod testrail;

pub use jira::JiraClient;
pub use testrail::TestRailClient;
