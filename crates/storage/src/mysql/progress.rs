//! ProgressStore implementation for MySqlStorage.

use super::*;

use crate::traits::ProgressStore;
use async_trait::async_trait;
use questline_core::ProgressUpdate;
use sqlx::types::Json;

#[async_trait]
impl ProgressStore for MySqlStorage {
    async fn upsert_progress(
        &self,
        session_id: &str,
        update: &ProgressUpdate,
    ) -> Result<SessionProgress, StorageError> {
        sqlx::query(
            "INSERT INTO ai_session_progress (session_id, chapter, scene, state)
             VALUES (?, ?, ?, COALESCE(?, JSON_OBJECT()))
             ON DUPLICATE KEY UPDATE
               chapter = COALESCE(VALUES(chapter), chapter),
               scene = COALESCE(VALUES(scene), scene),
               state = IF(? IS NULL, state, VALUES(state)),
               updated_at = CURRENT_TIMESTAMP",
        )
        .bind(session_id)
        .bind(&update.chapter)
        .bind(&update.scene)
        .bind(update.state.as_ref().map(Json))
        .bind(update.state.as_ref().map(Json))
        .execute(&self.pool)
        .await?;

        self.get_progress(session_id).await?.ok_or_else(|| StorageError::NotFound {
            entity: "session progress",
            id: session_id.to_owned(),
        })
    }

    async fn get_progress(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionProgress>, StorageError> {
        let row = sqlx::query(
            "SELECT session_id, chapter, scene, state, updated_at
             FROM ai_session_progress WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_progress(&r)).transpose()
    }

    async fn add_checkpoint(
        &self,
        session_id: &str,
        label: &str,
        state: &serde_json::Value,
    ) -> Result<ProgressCheckpoint, StorageError> {
        let result = sqlx::query(
            "INSERT INTO ai_progress_checkpoints (session_id, label, state) VALUES (?, ?, ?)",
        )
        .bind(session_id)
        .bind(label)
        .bind(Json(state))
        .execute(&self.pool)
        .await?;
        let row = sqlx::query(
            "SELECT id, session_id, label, state, created_at
             FROM ai_progress_checkpoints WHERE id = ?",
        )
        .bind(last_insert_id(&result))
        .fetch_one(&self.pool)
        .await?;
        row_to_checkpoint(&row)
    }

    async fn list_checkpoints(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProgressCheckpoint>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, session_id, label, state, created_at
             FROM ai_progress_checkpoints WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_checkpoint).collect()
    }
}
