//! Port for the upstream test-management REST API.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::DomainResult;

/// Issues one authenticated GET per call against the test-management API.
///
/// `endpoint` is the API method with its parameters, e.g.
/// `get_runs/4&milestone_id=9&limit=250&offset=0`. Implementations must
/// keep successive calls at least their configured interval apart and
/// fail with [`DomainError::UpstreamRequest`](crate::domain::errors::DomainError::UpstreamRequest)
/// on any non-success response.
#[async_trait]
pub trait TestManagementClient: Send + Sync {
    async fn fetch(&self, endpoint: &str) -> DomainResult<Value>;
}
