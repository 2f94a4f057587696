//! Per-milestone aggregation of plan and run metrics.
//!
//! Plans only report their counts on the detail endpoint, so each plan
//! costs one extra request. Runs carry their counts inline.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::DomainResult;
use crate::domain::models::checkpoint::IssuePercentages;
use crate::domain::models::metrics::{calculate_metrics, Metrics, PercentagePair};
use crate::domain::models::project::Milestone;
use crate::domain::ports::TestManagementClient;
use crate::services::paginator::fetch_all;

/// Result of aggregating one milestone that references at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneSummary {
    pub milestone_id: u64,
    pub issue_keys: BTreeSet<String>,
    pub metrics: Metrics,
    pub percentages: PercentagePair,
    pub plan_count: usize,
    pub run_count: usize,
}

impl MilestoneSummary {
    /// One pair for every referenced issue key.
    pub fn contributions(&self) -> IssuePercentages {
        IssuePercentages::from_milestone(&self.issue_keys, self.percentages)
    }
}

pub struct MilestoneAggregator {
    client: Arc<dyn TestManagementClient>,
}

impl MilestoneAggregator {
    pub fn new(client: Arc<dyn TestManagementClient>) -> Self {
        Self { client }
    }

    /// Aggregate a milestone, or `None` when it references no issues.
    ///
    /// Skipped milestones cost no requests.
    pub async fn aggregate(&self, project_id: u64, milestone: &Milestone) -> DomainResult<Option<MilestoneSummary>> {
        let issue_keys = milestone.issue_keys();
        if issue_keys.is_empty() {
            tracing::debug!(project_id, milestone_id = milestone.id, "milestone has no refs, skipping");
            return Ok(None);
        }

        tracing::info!(
            project_id,
            milestone_id = milestone.id,
            refs = %issue_keys.iter().cloned().collect::<Vec<_>>().join(", "),
            "aggregating milestone"
        );

        let (plan_metrics, plan_count) = self.plan_metrics(project_id, milestone.id).await?;
        let (run_metrics, run_count) = self.run_metrics(project_id, milestone.id).await?;
        let metrics = plan_metrics + run_metrics;
        let percentages = PercentagePair::from_metrics(metrics);

        tracing::debug!(
            milestone_id = milestone.id,
            total = metrics.total,
            executed = metrics.executed,
            passed = metrics.passed,
            coverage = percentages.coverage,
            pass_rate = percentages.pass_rate,
            "milestone aggregated"
        );

        Ok(Some(MilestoneSummary {
            milestone_id: milestone.id,
            issue_keys,
            metrics,
            percentages,
            plan_count,
            run_count,
        }))
    }

    async fn plan_metrics(&self, project_id: u64, milestone_id: u64) -> DomainResult<(Metrics, usize)> {
        let plans = fetch_all(
            self.client.as_ref(),
            &format!("get_plans/{project_id}&milestone_id={milestone_id}"),
            "plans",
        )
        .await?;

        let mut metrics = Metrics::default();
        for plan in &plans {
            let Some(plan_id) = plan.get("id").and_then(serde_json::Value::as_u64) else {
                tracing::warn!(project_id, milestone_id, "plan without id, skipping");
                continue;
            };
            tracing::debug!(plan_id, "fetching plan");
            let detail = self.client.fetch(&format!("get_plan/{plan_id}")).await?;
            metrics = metrics + calculate_metrics(&detail);
        }
        Ok((metrics, plans.len()))
    }

    async fn run_metrics(&self, project_id: u64, milestone_id: u64) -> DomainResult<(Metrics, usize)> {
        let runs = fetch_all(
            self.client.as_ref(),
            &format!("get_runs/{project_id}&milestone_id={milestone_id}"),
            "runs",
        )
        .await?;

        let metrics: Metrics = runs.iter().map(calculate_metrics).sum();
        Ok((metrics, runs.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::services::test_support::FakeTestRail;
    use serde_json::json;

    fn milestone(id: u64, refs: Option<&str>) -> Milestone {
        Milestone {
            id,
            name: None,
            refs: refs.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_combines_plans_and_runs() {
        let fake = Arc::new(
            FakeTestRail::new()
                .with_page("get_plans/1&milestone_id=10", "plans", vec![json!({ "id": 100 }), json!({ "id": 101 })])
                .with_response("get_plan/100", json!({ "passed_count": 4, "failed_count": 1, "untested_count": 5 }))
                .with_response("get_plan/101", json!({ "passed_count": 2, "blocked_count": 2, "untested_count": 0 }))
                .with_page(
                    "get_runs/1&milestone_id=10",
                    "runs",
                    vec![json!({ "id": 7, "passed_count": 4, "failed_count": 0, "untested_count": 2 })],
                ),
        );
        let aggregator = MilestoneAggregator::new(fake.clone());

        let summary = aggregator
            .aggregate(1, &milestone(10, Some("ABC-1, ABC-2")))
            .await
            .unwrap()
            .expect("milestone has refs");

        // plans: total 14, executed 9, passed 6; runs: total 6, executed 4, passed 4
        assert_eq!(summary.metrics, Metrics { total: 20, executed: 13, passed: 10 });
        assert_eq!(summary.percentages, PercentagePair::new(65, 50));
        assert_eq!(summary.plan_count, 2);
        assert_eq!(summary.run_count, 1);

        let contributions = summary.contributions();
        assert_eq!(contributions.len(), 2);
        assert_eq!(contributions.get("ABC-2"), Some(&[PercentagePair::new(65, 50)][..]));
    }

    #[tokio::test]
    async fn test_duplicate_refs_contribute_once() {
        let fake = Arc::new(FakeTestRail::new().with_page(
            "get_runs/1&milestone_id=10",
            "runs",
            vec![json!({ "passed_count": 1, "untested_count": 1 })],
        ));
        let aggregator = MilestoneAggregator::new(fake);

        let summary = aggregator
            .aggregate(1, &milestone(10, Some("X-1,X-1, X-1 ")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.contributions().sample_count(), 1);
    }

    #[tokio::test]
    async fn test_milestone_without_refs_makes_no_requests() {
        let fake = Arc::new(FakeTestRail::new());
        let aggregator = MilestoneAggregator::new(fake.clone());

        assert!(aggregator.aggregate(1, &milestone(10, None)).await.unwrap().is_none());
        assert!(aggregator.aggregate(1, &milestone(11, Some(" , ,"))).await.unwrap().is_none());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_milestone_reports_zero() {
        let fake = Arc::new(FakeTestRail::new());
        let aggregator = MilestoneAggregator::new(fake.clone());

        let summary = aggregator.aggregate(1, &milestone(10, Some("X-1"))).await.unwrap().unwrap();
        assert_eq!(summary.percentages, PercentagePair::new(0, 0));
        assert_eq!(
            fake.calls(),
            vec![
                "get_plans/1&milestone_id=10&limit=250&offset=0".to_string(),
                "get_runs/1&milestone_id=10&limit=250&offset=0".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_plan_detail_failure_is_fatal() {
        let fake = Arc::new(
            FakeTestRail::new()
                .with_page("get_plans/1&milestone_id=10", "plans", vec![json!({ "id": 100 })])
                .failing_on("get_plan/100"),
        );
        let aggregator = MilestoneAggregator::new(fake);

        let err = aggregator.aggregate(1, &milestone(10, Some("X-1"))).await.unwrap_err();
        assert!(matches!(err, DomainError::UpstreamRequest { .. }));
    }
}
