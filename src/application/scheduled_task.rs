//! Wires configuration, stored settings and adapters into a [`SyncJob`]
//! and drives it once or on a fixed interval.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::adapters::plugins::{JiraClient, TestRailClient};
use crate::adapters::sqlite::SqliteStateStore;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::Config;
use crate::domain::ports::SettingsStore;
use crate::services::publisher::{Publisher, TargetFields};
use crate::services::sync_job::{InvocationResponse, RunReport, SyncJob};

pub struct ScheduledTask {
    config: Config,
    store: Arc<SqliteStateStore>,
}

impl ScheduledTask {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            config,
            store: Arc::new(SqliteStateStore::new(pool)),
        }
    }

    /// Build a job from the stored settings. Missing or empty settings and
    /// an incomplete Jira connection are fatal.
    pub async fn build_job(&self) -> DomainResult<SyncJob> {
        let settings = self
            .store
            .load_settings()
            .await?
            .ok_or(DomainError::MissingSetting("syncSettings"))?
            .normalized();
        settings.validate()?;

        let testrail = TestRailClient::new(&settings, &self.config.testrail)?;
        let jira = JiraClient::new(&self.config.jira)?;
        let publisher = Publisher::new(
            Arc::new(jira),
            TargetFields {
                coverage_field_id: settings.coverage_field_id.clone(),
                pass_rate_field_id: settings.pass_rate_field_id.clone(),
            },
        );

        Ok(SyncJob::new(
            Arc::new(testrail),
            publisher,
            self.store.clone(),
            Duration::from_secs(self.config.job.time_budget_secs),
        ))
    }

    /// One run, with its report.
    pub async fn run_once(&self) -> DomainResult<RunReport> {
        self.build_job().await?.run().await
    }

    /// One run mapped to a status code and body.
    pub async fn invoke(&self) -> InvocationResponse {
        match self.run_once().await {
            Ok(report) => {
                tracing::debug!(run_id = %report.run_id, "invocation succeeded");
                InvocationResponse::success()
            }
            Err(err) => {
                tracing::error!(error = %err, "scheduled task failed");
                InvocationResponse::failure()
            }
        }
    }

    /// Invoke every `interval` until Ctrl-C.
    pub async fn run_every(&self, interval: Duration) -> usize {
        self.run_until(interval, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for ctrl-c");
            }
        })
        .await
    }

    /// Invoke, then wait `interval`, until `shutdown` resolves. An
    /// invocation always runs to completion before the next one starts;
    /// shutdown is only observed between invocations. Returns the number
    /// of invocations made.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut invocations = 0;

        loop {
            let response = self.invoke().await;
            invocations += 1;
            tracing::info!(
                invocation = invocations,
                status_code = response.status_code,
                next_in_secs = interval.as_secs(),
                "invocation finished"
            );

            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, stopping scheduler");
                    break;
                }
                () = tokio::time::sleep(interval) => {}
            }
        }

        invocations
    }
}
