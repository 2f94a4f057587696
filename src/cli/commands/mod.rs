//! CLI command implementations.

pub mod init;
pub mod run;
pub mod settings;
pub mod status;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::initialize_from_config;
use crate::domain::models::config::Config;

/// Open (and migrate) the configured database.
pub(crate) async fn open_database(config: &Config) -> Result<SqlitePool> {
    initialize_from_config(&config.database).await.with_context(|| {
        format!(
            "Failed to open database at {}. Run 'coverage-sync init' first.",
            config.database.path
        )
    })
}
