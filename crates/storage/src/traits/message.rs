use async_trait::async_trait;
use questline_core::{Message, NewMessage};

use crate::error::StorageError;

/// Session chat log (`ai_messages`).
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message. Fails with `ForeignKey` if the session does not exist.
    async fn insert_message(&self, message: &NewMessage) -> Result<Message, StorageError>;

    /// Messages of a session with `id > after_id`, ascending by id.
    async fn list_messages(
        &self,
        session_id: &str,
        after_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError>;
}
