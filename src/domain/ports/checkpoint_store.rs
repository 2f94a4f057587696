//! Persistence ports for the resume checkpoint and the sync settings.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::checkpoint::Checkpoint;
use crate::domain::models::settings::SyncSettings;

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the stored checkpoint; a fresh store yields the default (index 0, no samples).
    async fn load(&self) -> DomainResult<Checkpoint>;

    /// Persist cursor and samples together as one atomic update.
    async fn save(&self, checkpoint: &Checkpoint) -> DomainResult<()>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(&self) -> DomainResult<Option<SyncSettings>>;

    async fn save_settings(&self, settings: &SyncSettings) -> DomainResult<()>;
}
