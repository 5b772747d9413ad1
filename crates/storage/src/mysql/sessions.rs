//! SessionStore implementation for MySqlStorage.

use super::*;

use crate::traits::SessionStore;
use async_trait::async_trait;
use questline_core::SessionStart;

#[async_trait]
impl SessionStore for MySqlStorage {
    async fn upsert_session(&self, start: &SessionStart) -> Result<Session, StorageError> {
        // Reactivation leaves game, user and character untouched.
        sqlx::query(
            "INSERT INTO ai_sessions (session_id, game_id, user_id, character_id, status)
             VALUES (?, ?, ?, ?, 'active')
             ON DUPLICATE KEY UPDATE status = 'active', ended_at = NULL",
        )
        .bind(&start.session_id)
        .bind(&start.game_id)
        .bind(&start.user_id)
        .bind(&start.character_id)
        .execute(&self.pool)
        .await?;

        self.get_session(&start.session_id).await?.ok_or_else(|| StorageError::NotFound {
            entity: "session",
            id: start.session_id.clone(),
        })
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM ai_sessions WHERE session_id = ?"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn end_session(&self, session_id: &str) -> Result<bool, StorageError> {
        // Existence is checked separately: an already-ended row reports zero
        // affected rows under MySQL's found-rows semantics.
        let exists = sqlx::query("SELECT 1 FROM ai_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !exists {
            return Ok(false);
        }
        sqlx::query(
            "UPDATE ai_sessions SET status = 'ended', ended_at = CURRENT_TIMESTAMP
             WHERE session_id = ?",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    async fn list_user_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Session>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM ai_sessions
             WHERE user_id = ? ORDER BY started_at DESC, session_id LIMIT ?"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_session).collect()
    }
}
