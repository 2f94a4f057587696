//! `coverage-sync run`: one invocation, or a sequential schedule.

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;

use crate::application::ScheduledTask;
use crate::cli::commands::open_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::services::sync_job::{RunReport, FAILURE_BODY, SUCCESS_BODY};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Repeat every N seconds until Ctrl-C
    #[arg(long, value_name = "SECS", conflicts_with = "daemon", value_parser = clap::value_parser!(u64).range(1..))]
    pub every: Option<u64>,

    /// Repeat every job.schedule_interval_secs until Ctrl-C
    #[arg(long)]
    pub daemon: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct RunOutput {
    pub status_code: u16,
    pub body: String,
    pub report: RunReport,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let r = &self.report;
        let mut lines = vec![
            self.body.clone(),
            format!("Run ID: {}", r.run_id),
            format!(
                "Projects: {} processed ({} -> {} of {})",
                r.projects_processed, r.start_index, r.next_index, r.project_count
            ),
            format!(
                "Milestones: {} aggregated, {} without refs",
                r.milestones_aggregated, r.milestones_skipped
            ),
            format!("Issues updated: {}", r.issues_published),
        ];
        if !r.issues_failed.is_empty() {
            lines.push(format!("Issues failed: {}", r.issues_failed.join(", ")));
        }
        if r.budget_exhausted {
            lines.push("Time budget exhausted; the next run resumes from the cursor.".to_string());
        } else if r.cycle_complete {
            lines.push("Cycle complete; the next run starts a new cycle.".to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ScheduleOutput {
    pub interval_secs: u64,
    pub invocations: usize,
}

impl CommandOutput for ScheduleOutput {
    fn to_human(&self) -> String {
        format!(
            "Stopped after {} invocation(s) (every {}s).",
            self.invocations, self.interval_secs
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RunArgs, config: &Config, json_mode: bool) -> Result<()> {
    let interval_secs = match (args.every, args.daemon) {
        (Some(secs), _) => Some(secs),
        (None, true) => Some(config.job.schedule_interval_secs),
        (None, false) => None,
    };

    let pool = open_database(config).await?;
    let task = ScheduledTask::new(config.clone(), pool);

    if let Some(interval_secs) = interval_secs {
        tracing::info!(interval_secs, "starting scheduled runs, Ctrl-C to stop");
        let invocations = task.run_every(Duration::from_secs(interval_secs)).await;
        output(
            &ScheduleOutput {
                interval_secs,
                invocations,
            },
            json_mode,
        );
        return Ok(());
    }

    match task.run_once().await {
        Ok(report) => {
            output(
                &RunOutput {
                    status_code: 200,
                    body: SUCCESS_BODY.to_string(),
                    report,
                },
                json_mode,
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "scheduled task failed");
            Err(anyhow!(err).context(FAILURE_BODY))
        }
    }
}
