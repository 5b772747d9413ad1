//! MessageStore implementation for MySqlStorage.

use super::*;

use crate::traits::MessageStore;
use async_trait::async_trait;
use questline_core::NewMessage;

#[async_trait]
impl MessageStore for MySqlStorage {
    async fn insert_message(&self, message: &NewMessage) -> Result<Message, StorageError> {
        let result = sqlx::query(
            "INSERT INTO ai_messages (session_id, role, type, content) VALUES (?, ?, ?, ?)",
        )
        .bind(&message.session_id)
        .bind(message.role.as_str())
        .bind(message.message_type.as_str())
        .bind(&message.content)
        .execute(&self.pool)
        .await?;
        let id = last_insert_id(&result);

        let row = sqlx::query(&format!("SELECT {MESSAGE_COLUMNS} FROM ai_messages WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        row_to_message(&row)
    }

    async fn list_messages(
        &self,
        session_id: &str,
        after_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM ai_messages
             WHERE session_id = ? AND id > ?
             ORDER BY id ASC LIMIT ?"
        ))
        .bind(session_id)
        .bind(after_id.unwrap_or(0))
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_message).collect()
    }
}
