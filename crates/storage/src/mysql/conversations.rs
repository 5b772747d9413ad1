//! ConversationStore implementation for MySqlStorage.

use super::*;

use crate::traits::ConversationStore;
use async_trait::async_trait;
use questline_core::ConversationSummary;
use sqlx::types::Json;

#[async_trait]
impl ConversationStore for MySqlStorage {
    async fn save_conversation(&self, log: &ConversationLog) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO ai_conversation_logs (game_id, character_id, user_id, title, messages)
             VALUES (?, ?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE
               user_id = VALUES(user_id),
               title = VALUES(title),
               messages = VALUES(messages),
               updated_at = CURRENT_TIMESTAMP",
        )
        .bind(&log.game_id)
        .bind(&log.character_id)
        .bind(&log.user_id)
        .bind(&log.title)
        .bind(Json(&log.messages))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<Option<ConversationLog>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM ai_conversation_logs
             WHERE game_id = ? AND character_id = ?"
        ))
        .bind(game_id)
        .bind(character_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_conversation(&r)).transpose()
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM ai_conversation_logs
             WHERE user_id = ? ORDER BY updated_at DESC, id DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|r| row_to_conversation(r).map(|log| ConversationSummary::from(&log)))
            .collect()
    }

    async fn delete_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "DELETE FROM ai_conversation_logs WHERE game_id = ? AND character_id = ?",
        )
        .bind(game_id)
        .bind(character_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
