//! In-memory port fakes shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::checkpoint::Checkpoint;
use crate::domain::ports::{CheckpointStore, IssueTracker, TestManagementClient};

/// Canned TestRail: unknown endpoints answer `{}` (an empty page).
#[derive(Default)]
pub struct FakeTestRail {
    responses: HashMap<String, Value>,
    failures: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeTestRail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(endpoint.to_string(), body);
        self
    }

    /// Single first page of a paginated endpoint.
    pub fn with_page(self, endpoint: &str, items_field: &str, items: Vec<Value>) -> Self {
        self.with_response(
            &format!("{endpoint}&limit=250&offset=0"),
            json!({ items_field: items }),
        )
    }

    pub fn failing_on(mut self, endpoint: &str) -> Self {
        self.failures.insert(endpoint.to_string());
        self
    }

    /// Sleep (on the tokio clock) before answering `endpoint`.
    pub fn with_delay(mut self, endpoint: &str, delay: Duration) -> Self {
        self.delays.insert(endpoint.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TestManagementClient for FakeTestRail {
    async fn fetch(&self, endpoint: &str) -> DomainResult<Value> {
        self.calls.lock().unwrap().push(endpoint.to_string());

        if let Some(delay) = self.delays.get(endpoint) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(endpoint) {
            return Err(DomainError::UpstreamRequest {
                endpoint: endpoint.to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.responses.get(endpoint).cloned().unwrap_or_else(|| json!({})))
    }
}

/// Records every update; keys in `failing` are rejected.
#[derive(Default)]
pub struct FakeIssueTracker {
    failing: HashSet<String>,
    updates: Mutex<Vec<(String, Map<String, Value>)>>,
    attempts: Mutex<Vec<String>>,
}

impl FakeIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, issue_key: &str) -> Self {
        self.failing.insert(issue_key.to_string());
        self
    }

    pub fn updates(&self) -> Vec<(String, Map<String, Value>)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// Fields written to `issue_key`, if it was updated.
    pub fn fields_for(&self, issue_key: &str) -> Option<Map<String, Value>> {
        self.updates()
            .into_iter()
            .find(|(key, _)| key == issue_key)
            .map(|(_, fields)| fields)
    }
}

#[async_trait]
impl IssueTracker for FakeIssueTracker {
    async fn update_fields(&self, issue_key: &str, fields: Map<String, Value>) -> DomainResult<()> {
        self.attempts.lock().unwrap().push(issue_key.to_string());
        if self.failing.contains(issue_key) {
            return Err(DomainError::IssueUpdateFailed {
                issue_key: issue_key.to_string(),
                message: "Jira returned 404 Not Found".to_string(),
            });
        }
        self.updates.lock().unwrap().push((issue_key.to_string(), fields));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCheckpointStore {
    checkpoint: Mutex<Checkpoint>,
    saves: Mutex<usize>,
}

impl MemoryCheckpointStore {
    pub fn with_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            checkpoint: Mutex::new(checkpoint),
            saves: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> Checkpoint {
        self.checkpoint.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(&self) -> DomainResult<Checkpoint> {
        Ok(self.snapshot())
    }

    async fn save(&self, checkpoint: &Checkpoint) -> DomainResult<()> {
        *self.checkpoint.lock().unwrap() = checkpoint.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
