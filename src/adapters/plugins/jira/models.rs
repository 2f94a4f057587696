//! Jira REST API v3 request models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `PUT /rest/api/3/issue/{key}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueUpdateRequest {
    /// Field id -> new value
    pub fields: Map<String, Value>,
}
