//! `coverage-sync status`: checkpoint cursor and current averages.

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};

use crate::adapters::sqlite::SqliteStateStore;
use crate::cli::commands::open_database;
use crate::cli::output::{output, table, CommandOutput};
use crate::domain::models::checkpoint::{average, Checkpoint};
use crate::domain::models::config::Config;
use crate::domain::ports::{CheckpointStore, SettingsStore};

#[derive(Debug, serde::Serialize)]
pub struct IssueStatus {
    pub issue_key: String,
    pub samples: usize,
    pub coverage: u8,
    pub pass_rate: u8,
}

#[derive(Debug, serde::Serialize)]
pub struct StatusOutput {
    pub settings_configured: bool,
    pub last_index: usize,
    pub issue_count: usize,
    pub sample_count: usize,
    pub issues: Vec<IssueStatus>,
}

impl StatusOutput {
    pub fn new(checkpoint: &Checkpoint, settings_configured: bool) -> Self {
        let issues = checkpoint
            .jira_percentages
            .iter()
            .filter_map(|(key, pairs)| {
                average(pairs).map(|avg| IssueStatus {
                    issue_key: key.to_string(),
                    samples: pairs.len(),
                    coverage: avg.coverage,
                    pass_rate: avg.pass_rate,
                })
            })
            .collect();

        Self {
            settings_configured,
            last_index: checkpoint.last_index,
            issue_count: checkpoint.jira_percentages.len(),
            sample_count: checkpoint.jira_percentages.sample_count(),
            issues,
        }
    }
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "Settings: {}",
                if self.settings_configured { "configured" } else { "missing" }
            ),
            format!("Cursor (lastIndex): {}", self.last_index),
            format!(
                "Accumulated: {} sample(s) across {} issue(s)",
                self.sample_count, self.issue_count
            ),
        ];

        if !self.issues.is_empty() {
            let mut t = table(["Issue", "Samples", "Coverage %", "Pass rate %"]);
            for issue in &self.issues {
                t.add_row(vec![
                    Cell::new(&issue.issue_key),
                    Cell::new(issue.samples).set_alignment(CellAlignment::Right),
                    Cell::new(issue.coverage).set_alignment(CellAlignment::Right),
                    Cell::new(issue.pass_rate).set_alignment(CellAlignment::Right),
                ]);
            }
            lines.push(String::new());
            lines.push(t.to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let store = SqliteStateStore::new(open_database(config).await?);
    let checkpoint = store.load().await.context("Failed to load checkpoint")?;
    let settings_configured = store
        .load_settings()
        .await
        .context("Failed to load settings")?
        .is_some_and(|s| s.validate().is_ok());

    output(&StatusOutput::new(&checkpoint, settings_configured), json_mode);
    Ok(())
}
