use async_trait::async_trait;
use questline_core::{ConversationLog, ConversationSummary};

use crate::error::StorageError;

/// Per (game, character) transcripts (`ai_conversation_logs`).
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert or wholly replace the log for `(game_id, character_id)`.
    async fn save_conversation(&self, log: &ConversationLog) -> Result<(), StorageError>;

    async fn get_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<Option<ConversationLog>, StorageError>;

    /// A user's logs, most recently updated first.
    async fn list_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, StorageError>;

    /// Returns `true` if a row was deleted.
    async fn delete_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<bool, StorageError>;
}
