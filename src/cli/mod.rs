//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::init::InitArgs;
use commands::run::RunArgs;
use commands::settings::SettingsArgs;

#[derive(Parser, Debug)]
#[command(name = "coverage-sync")]
#[command(about = "Aggregate TestRail coverage and pass rates into Jira issues", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .coverage-sync/config.yaml and local.yaml)
    #[arg(short, long, global = true, env = "COVERAGE_SYNC_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the project directory, default config and database
    Init(InitArgs),
    /// Manage the stored TestRail credentials and Jira field ids
    Settings(SettingsArgs),
    /// Run the sync job once, or repeatedly with --every/--daemon
    Run(RunArgs),
    /// Show the checkpoint cursor and accumulated averages
    Status,
}

/// Report a command failure on stderr (or stdout as JSON).
pub fn handle_error(err: &anyhow::Error, json_mode: bool) {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
}
