use async_trait::async_trait;
use questline_core::Game;

use crate::error::StorageError;

/// Game template rows (`ai_games`).
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Insert a new game. Fails with `Duplicate` if `game_id` exists.
    async fn insert_game(&self, game: &Game) -> Result<(), StorageError>;

    /// Get game by ID.
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError>;
}
