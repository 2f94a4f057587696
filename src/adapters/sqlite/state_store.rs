//! SQLite adapter for CheckpointStore and SettingsStore.
//!
//! Both ports share the `kv_store` table; each value is a JSON document.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::checkpoint::{Checkpoint, IssuePercentages};
use crate::domain::models::settings::{SyncSettings, SETTINGS_KEY};
use crate::domain::ports::{CheckpointStore, SettingsStore};

/// Cursor into the sorted project list.
pub const LAST_INDEX_KEY: &str = "lastIndex";

/// Issue key -> accumulated percentage pairs.
pub const PERCENTAGES_KEY: &str = "jiraPercentages";

#[derive(Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DomainResult<Option<T>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(value,)| {
            serde_json::from_str(&value)
                .map_err(|e| DomainError::SerializationError(format!("{key}: {e}")))
        })
        .transpose()
    }

    async fn put_json<T: Serialize + Sync>(
        tx: &mut Transaction<'_, Sqlite>,
        key: &str,
        value: &T,
    ) -> DomainResult<()> {
        let value = serde_json::to_string(value)?;
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(&value)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for SqliteStateStore {
    async fn load(&self) -> DomainResult<Checkpoint> {
        let last_index: Option<usize> = self.get_json(LAST_INDEX_KEY).await?;
        let jira_percentages: Option<IssuePercentages> = self.get_json(PERCENTAGES_KEY).await?;

        Ok(Checkpoint {
            last_index: last_index.unwrap_or(0),
            jira_percentages: jira_percentages.unwrap_or_default(),
        })
    }

    async fn save(&self, checkpoint: &Checkpoint) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::put_json(&mut tx, PERCENTAGES_KEY, &checkpoint.jira_percentages).await?;
        Self::put_json(&mut tx, LAST_INDEX_KEY, &checkpoint.last_index).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqliteStateStore {
    async fn load_settings(&self) -> DomainResult<Option<SyncSettings>> {
        self.get_json(SETTINGS_KEY).await
    }

    async fn save_settings(&self, settings: &SyncSettings) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::put_json(&mut tx, SETTINGS_KEY, settings).await?;
        tx.commit().await?;
        Ok(())
    }
}
