use async_trait::async_trait;
use questline_core::{ProgressCheckpoint, ProgressUpdate, SessionProgress};

use crate::error::StorageError;

/// Session progress and checkpoints.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Insert or merge the progress row of a session.
    async fn upsert_progress(
        &self,
        session_id: &str,
        update: &ProgressUpdate,
    ) -> Result<SessionProgress, StorageError>;

    async fn get_progress(&self, session_id: &str)
    -> Result<Option<SessionProgress>, StorageError>;

    /// Append a checkpoint. Fails with `ForeignKey` if the session does not exist.
    async fn add_checkpoint(
        &self,
        session_id: &str,
        label: &str,
        state: &serde_json::Value,
    ) -> Result<ProgressCheckpoint, StorageError>;

    /// Checkpoints of a session, ascending by id.
    async fn list_checkpoints(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProgressCheckpoint>, StorageError>;
}
