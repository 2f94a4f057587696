//! One time-boxed, resumable aggregation pass.
//!
//! A run picks up at the persisted cursor, walks projects in ascending id
//! order until either the list ends or the time budget is spent, then
//! publishes the averaged percentages and saves the new cursor. The
//! checkpoint is written exactly once, at the end of a run that did not
//! fail; a fatal error leaves the stored state as it was.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::checkpoint::{Checkpoint, IssuePercentages};
use crate::domain::models::project::{Milestone, Project};
use crate::domain::ports::{CheckpointStore, TestManagementClient};
use crate::services::milestone_aggregator::MilestoneAggregator;
use crate::services::paginator::fetch_all_as;
use crate::services::publisher::Publisher;

/// Body returned for a run that completed.
pub const SUCCESS_BODY: &str = "Scheduled task completed successfully";
/// Body returned for a run that failed.
pub const FAILURE_BODY: &str = "Error processing scheduled task";

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub start_index: usize,
    pub next_index: usize,
    pub project_count: usize,
    pub projects_processed: usize,
    pub milestones_aggregated: usize,
    pub milestones_skipped: usize,
    pub issues_published: usize,
    pub issues_failed: Vec<String>,
    pub cycle_complete: bool,
    pub budget_exhausted: bool,
}

/// Scheduler-facing outcome of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: SUCCESS_BODY.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            status_code: 500,
            body: FAILURE_BODY.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct ProjectOutcome {
    contributions: IssuePercentages,
    aggregated: usize,
    skipped: usize,
}

pub struct SyncJob {
    client: Arc<dyn TestManagementClient>,
    aggregator: MilestoneAggregator,
    publisher: Publisher,
    store: Arc<dyn CheckpointStore>,
    time_budget: Duration,
}

impl SyncJob {
    pub fn new(
        client: Arc<dyn TestManagementClient>,
        publisher: Publisher,
        store: Arc<dyn CheckpointStore>,
        time_budget: Duration,
    ) -> Self {
        Self {
            aggregator: MilestoneAggregator::new(client.clone()),
            client,
            publisher,
            store,
            time_budget,
        }
    }

    /// Run once and map the outcome to a status code and body.
    pub async fn invoke(&self) -> InvocationResponse {
        match self.run().await {
            Ok(_) => InvocationResponse::success(),
            Err(err) => {
                tracing::error!(error = %err, "scheduled task failed");
                InvocationResponse::failure()
            }
        }
    }

    /// Run one pass. Errors from TestRail or the store abort the run before
    /// anything is published or saved.
    pub async fn run(&self) -> DomainResult<RunReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> DomainResult<RunReport> {
        let started = Instant::now();

        let mut projects: Vec<Project> = fetch_all_as(self.client.as_ref(), "get_projects", "projects").await?;
        Project::sort_for_cursor(&mut projects);
        let project_count = projects.len();

        let checkpoint = self.store.load().await?;
        let (start_index, base) = checkpoint.resume(project_count);
        tracing::info!(
            project_count,
            start_index,
            carried_keys = base.len(),
            "starting sync run"
        );

        let mut batch = IssuePercentages::new();
        let mut next_index = start_index;
        let mut milestones_aggregated = 0;
        let mut milestones_skipped = 0;
        let mut budget_exhausted = false;

        while next_index < project_count {
            let project = &projects[next_index];
            let outcome = self.process_project(project).await?;
            batch = batch.merged(outcome.contributions);
            milestones_aggregated += outcome.aggregated;
            milestones_skipped += outcome.skipped;
            next_index += 1;

            let elapsed = started.elapsed();
            if next_index < project_count && elapsed > self.time_budget {
                tracing::warn!(
                    next_index,
                    elapsed_secs = elapsed.as_secs(),
                    "time budget exhausted, stopping early"
                );
                budget_exhausted = true;
                break;
            }
        }

        let merged = base.merged(batch);
        let averages = merged.averages();
        let summary = self.publisher.publish(&averages).await;

        self.store
            .save(&Checkpoint {
                last_index: next_index,
                jira_percentages: merged,
            })
            .await?;

        let report = RunReport {
            run_id,
            start_index,
            next_index,
            project_count,
            projects_processed: next_index - start_index,
            milestones_aggregated,
            milestones_skipped,
            issues_published: summary.updated,
            issues_failed: summary.failed,
            cycle_complete: next_index >= project_count,
            budget_exhausted,
        };
        tracing::info!(
            next_index,
            projects_processed = report.projects_processed,
            issues_published = report.issues_published,
            issues_failed = report.issues_failed.len(),
            "sync run finished"
        );
        Ok(report)
    }

    async fn process_project(&self, project: &Project) -> DomainResult<ProjectOutcome> {
        tracing::info!(project_id = project.id, name = ?project.name, "processing project");

        let milestones: Vec<Milestone> = fetch_all_as(
            self.client.as_ref(),
            &format!("get_milestones/{}", project.id),
            "milestones",
        )
        .await?;

        let mut outcome = ProjectOutcome::default();
        for milestone in &milestones {
            match self.aggregator.aggregate(project.id, milestone).await? {
                Some(summary) => {
                    outcome.contributions = std::mem::take(&mut outcome.contributions).merged(summary.contributions());
                    outcome.aggregated += 1;
                }
                None => outcome.skipped += 1,
            }
        }
        Ok(outcome)
    }
}
