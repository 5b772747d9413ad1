use async_trait::async_trait;
use questline_core::{Session, SessionStart};

use crate::error::StorageError;

/// Session lifecycle operations (`ai_sessions`).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert an active session, or reactivate the existing row with the same id
    /// (status `active`, `ended_at` cleared). Returns the stored row.
    async fn upsert_session(&self, start: &SessionStart) -> Result<Session, StorageError>;

    /// Get session by ID.
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StorageError>;

    /// Mark a session ended. Returns `false` if no such session exists.
    async fn end_session(&self, session_id: &str) -> Result<bool, StorageError>;

    /// Sessions started by a user, newest first.
    async fn list_user_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Session>, StorageError>;
}
