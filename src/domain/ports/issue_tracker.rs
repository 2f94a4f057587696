//! Port for writing computed values back to the issue tracker.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::errors::DomainResult;

#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Set `fields` (field id -> value) on the issue identified by `issue_key`.
    async fn update_fields(&self, issue_key: &str, fields: Map<String, Value>) -> DomainResult<()>;
}
