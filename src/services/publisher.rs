//! Writes averaged percentages into the issue tracker.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::models::metrics::PercentagePair;
use crate::domain::ports::IssueTracker;

/// Outcome of one publishing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    pub updated: usize,
    pub failed: Vec<String>,
}

/// Field ids that receive the two averaged values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFields {
    pub coverage_field_id: String,
    pub pass_rate_field_id: String,
}

impl TargetFields {
    fn payload(&self, pair: PercentagePair) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(self.coverage_field_id.clone(), Value::from(pair.coverage));
        fields.insert(self.pass_rate_field_id.clone(), Value::from(pair.pass_rate));
        fields
    }
}

pub struct Publisher {
    tracker: Arc<dyn IssueTracker>,
    fields: TargetFields,
}

impl Publisher {
    pub fn new(tracker: Arc<dyn IssueTracker>, fields: TargetFields) -> Self {
        Self { tracker, fields }
    }

    /// Update every issue independently. A failed write is logged and
    /// skipped; it never stops the remaining keys.
    pub async fn publish(&self, averages: &BTreeMap<String, PercentagePair>) -> PublishSummary {
        let mut summary = PublishSummary::default();

        for (issue_key, pair) in averages {
            tracing::info!(
                issue_key = %issue_key,
                coverage = pair.coverage,
                pass_rate = pair.pass_rate,
                "updating issue"
            );
            match self.tracker.update_fields(issue_key, self.fields.payload(*pair)).await {
                Ok(()) => summary.updated += 1,
                Err(err) => {
                    tracing::warn!(issue_key = %issue_key, error = %err, "issue update failed");
                    summary.failed.push(issue_key.clone());
                }
            }
        }

        summary
    }
}
