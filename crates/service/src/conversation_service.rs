use std::sync::Arc;

use chrono::Utc;
use questline_core::{
    ConversationLog, ConversationSummary, DEFAULT_CONVERSATION_TITLE, DEFAULT_QUERY_LIMIT,
    NewCharacter,
};
use questline_storage::StorageBackend;
use questline_storage::traits::ConversationStore;
use serde::Deserialize;
use serde_json::Value;

use crate::character_service::CharacterService;
use crate::error::ServiceError;
use crate::{clamp_limit, non_empty, required};

/// Body of `POST /api/conversations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConversation {
    pub game_id: Option<String>,
    pub character_id: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub messages: Option<Value>,
}

pub struct ConversationService {
    storage: Arc<StorageBackend>,
    characters: Arc<CharacterService>,
}

impl ConversationService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>, characters: Arc<CharacterService>) -> Self {
        Self { storage, characters }
    }

    /// Replace the stored log for (game, character) with the given messages.
    pub async fn save(&self, input: SaveConversation) -> Result<ConversationLog, ServiceError> {
        let game_id = required(input.game_id.as_deref(), "gameId")?;
        let character_id = required(input.character_id.as_deref(), "characterId")?;
        let user_id = required(input.user_id.as_deref(), "userId")?;
        let Some(Value::Array(messages)) = input.messages else {
            return Err(ServiceError::InvalidInput("messages must be an array".to_owned()));
        };

        self.characters
            .ensure_character(NewCharacter::new(character_id, game_id, user_id))
            .await?;

        let log = ConversationLog {
            game_id: game_id.to_owned(),
            character_id: character_id.to_owned(),
            user_id: user_id.to_owned(),
            title: non_empty(input.title.as_deref())
                .unwrap_or(DEFAULT_CONVERSATION_TITLE)
                .to_owned(),
            messages,
            updated_at: Utc::now(),
        };
        self.storage.save_conversation(&log).await?;
        tracing::debug!(
            game_id = %log.game_id,
            character_id = %log.character_id,
            messages = log.messages.len(),
            "conversation saved"
        );
        self.get(game_id, character_id).await
    }

    pub async fn get(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<ConversationLog, ServiceError> {
        self.storage
            .get_conversation(game_id, character_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("conversation", format!("{game_id}/{character_id}")))
    }

    pub async fn list(
        &self,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<ConversationSummary>, ServiceError> {
        let user_id = required(user_id, "userId")?;
        let limit = clamp_limit(limit, DEFAULT_QUERY_LIMIT);
        Ok(self.storage.list_conversations(user_id, limit).await?)
    }

    pub async fn delete(&self, game_id: &str, character_id: &str) -> Result<(), ServiceError> {
        if self.storage.delete_conversation(game_id, character_id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("conversation", format!("{game_id}/{character_id}")))
        }
    }
}
