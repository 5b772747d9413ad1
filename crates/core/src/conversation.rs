use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Saved chat transcript for one (game, character) pair.
///
/// Written wholesale: every save replaces `messages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationLog {
    pub game_id: String,
    pub character_id: String,
    pub user_id: String,
    pub title: String,
    pub messages: Vec<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row for a user's conversation logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    pub game_id: String,
    pub character_id: String,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&ConversationLog> for ConversationSummary {
    fn from(log: &ConversationLog) -> Self {
        Self {
            game_id: log.game_id.clone(),
            character_id: log.character_id.clone(),
            title: log.title.clone(),
            message_count: log.messages.len(),
            updated_at: log.updated_at,
        }
    }
}
