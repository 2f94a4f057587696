//! `coverage-sync settings`: manage the stored sync settings.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::adapters::sqlite::SqliteStateStore;
use crate::cli::commands::open_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::settings::SyncSettings;
use crate::domain::ports::SettingsStore;

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Validate and store TestRail credentials and target Jira fields
    Set {
        /// TestRail user (email)
        #[arg(long)]
        user: String,

        /// TestRail API key
        #[arg(long, env = "COVERAGE_SYNC_TESTRAIL_TOKEN", hide_env_values = true)]
        token: String,

        /// TestRail base URL, e.g. https://example.testrail.io
        #[arg(long)]
        base_url: String,

        /// Jira custom field receiving the coverage percentage
        #[arg(long = "coverage-field")]
        coverage_field_id: String,

        /// Jira custom field receiving the pass-rate percentage
        #[arg(long = "pass-rate-field")]
        pass_rate_field_id: String,
    },
    /// Show the stored settings with the token redacted
    Show,
}

#[derive(Debug, serde::Serialize)]
pub struct SettingsOutput {
    pub configured: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SyncSettings>,
}

impl CommandOutput for SettingsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(ref s) = self.settings {
            lines.push(format!("  User:              {}", s.user));
            lines.push(format!("  Token:             {}", s.token));
            lines.push(format!("  Base URL:          {}", s.base_url));
            lines.push(format!("  Coverage field:    {}", s.coverage_field_id));
            lines.push(format!("  Pass rate field:   {}", s.pass_rate_field_id));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SettingsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = SqliteStateStore::new(open_database(config).await?);
    let out = match args.command {
        SettingsCommands::Set {
            user,
            token,
            base_url,
            coverage_field_id,
            pass_rate_field_id,
        } => {
            let settings = SyncSettings {
                user,
                token,
                base_url,
                coverage_field_id,
                pass_rate_field_id,
            };
            set(&store, settings).await?
        }
        SettingsCommands::Show => show(&store).await?,
    };
    output(&out, json_mode);
    Ok(())
}

async fn set(store: &impl SettingsStore, settings: SyncSettings) -> Result<SettingsOutput> {
    let settings = settings.normalized();
    settings.validate().context("Settings rejected")?;
    store.save_settings(&settings).await.context("Failed to save settings")?;

    Ok(SettingsOutput {
        configured: true,
        message: "Settings saved.".to_string(),
        settings: Some(settings.redacted()),
    })
}

async fn show(store: &impl SettingsStore) -> Result<SettingsOutput> {
    let stored = store.load_settings().await.context("Failed to load settings")?;
    Ok(match stored {
        Some(settings) => SettingsOutput {
            configured: settings.validate().is_ok(),
            message: "Stored settings:".to_string(),
            settings: Some(settings.redacted()),
        },
        None => SettingsOutput {
            configured: false,
            message: "No settings stored. Use 'coverage-sync settings set'.".to_string(),
            settings: None,
        },
    })
}
