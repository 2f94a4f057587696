//! Implementation of the `coverage-sync init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::infrastructure::config::CONFIG_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote {CONFIG_DIR}/config.yaml"));
        }
        if self.success {
            lines.push(format!("Database initialized at {}", self.database_path.display()));
            lines.push("\nNext: coverage-sync settings set --user .. --token .. --base-url ..".to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let out = initialize(&args).await?;
    output(&out, json_mode);
    Ok(())
}

/// Create `.coverage-sync/`, a default `config.yaml` and the database.
pub async fn initialize(args: &InitArgs) -> Result<InitOutput> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let project_dir = target_path.join(CONFIG_DIR);
    let config_path = project_dir.join("config.yaml");
    let config = Config::default();
    let database_path = target_path.join(&config.database.path);

    if config_path.exists() && !args.force {
        return Ok(InitOutput {
            success: false,
            message: "Project already initialized. Use --force to rewrite config.yaml.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_path,
        });
    }

    fs::create_dir_all(&project_dir)
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    write_default_config(&config_path, &config).await?;

    // The checkpoint and settings live in the database; --force never drops them.
    let db_url = format!("sqlite:{}", database_path.display());
    initialize_database(&db_url, None)
        .await
        .context("Failed to initialize database")?;

    Ok(InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_path,
    })
}

async fn write_default_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize default config")?;
    let content = format!(
        "# coverage-sync configuration\n\
         # Secrets are better supplied as COVERAGE_SYNC_JIRA__API_TOKEN.\n{yaml}"
    );
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
