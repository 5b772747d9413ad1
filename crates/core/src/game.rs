use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_GAME_TITLE;

/// A game template row (`ai_games`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub game_id: String,
    pub title: String,
    pub genre: Option<String>,
    pub difficulty: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes used when a game is created on first reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGame {
    pub game_id: String,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub difficulty: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewGame {
    pub fn with_id(game_id: impl Into<String>) -> Self {
        Self { game_id: game_id.into(), ..Self::default() }
    }

    /// Materialize the row that an insert would create.
    pub fn into_game(self, now: DateTime<Utc>) -> Game {
        Game {
            game_id: self.game_id,
            title: self.title.unwrap_or_else(|| DEFAULT_GAME_TITLE.to_owned()),
            genre: self.genre,
            difficulty: self.difficulty,
            metadata: self.metadata.unwrap_or_else(|| serde_json::json!({})),
            created_at: now,
            updated_at: now,
        }
    }
}
