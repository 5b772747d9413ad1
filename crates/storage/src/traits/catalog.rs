use async_trait::async_trait;
use questline_core::{
    CatalogGame, GameProgress, GameTitle, NewCatalogGame, NewPlayerCharacter, PlayerCharacter,
    SaveProgress,
};

use crate::error::StorageError;

/// Older `games` and `characters` tables.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_catalog_games(&self, limit: usize) -> Result<Vec<CatalogGame>, StorageError>;

    async fn get_catalog_game(&self, id: i64) -> Result<Option<CatalogGame>, StorageError>;

    async fn create_catalog_game(&self, game: &NewCatalogGame)
    -> Result<CatalogGame, StorageError>;

    async fn list_player_characters(
        &self,
        user_id: i64,
        game_id: Option<i64>,
    ) -> Result<Vec<PlayerCharacter>, StorageError>;

    async fn get_player_character(&self, id: i64)
    -> Result<Option<PlayerCharacter>, StorageError>;

    /// Fails with `ForeignKey` if the game does not exist.
    async fn create_player_character(
        &self,
        character: &NewPlayerCharacter,
    ) -> Result<PlayerCharacter, StorageError>;

    async fn delete_player_character(&self, id: i64) -> Result<bool, StorageError>;
}

/// Older `progress` and `game_titles` tables, one row per (user, game).
#[async_trait]
pub trait SaveSlotStore: Send + Sync {
    async fn get_game_progress(
        &self,
        user_id: i64,
        game_id: i64,
    ) -> Result<Option<GameProgress>, StorageError>;

    /// Insert or replace the save slot of `(user_id, game_id)`.
    async fn save_game_progress(&self, save: &SaveProgress) -> Result<GameProgress, StorageError>;

    async fn list_game_titles(&self, user_id: i64) -> Result<Vec<GameTitle>, StorageError>;

    async fn get_game_title(&self, id: i64) -> Result<Option<GameTitle>, StorageError>;

    /// Insert or replace the title of `(user_id, game_id)`.
    async fn save_game_title(
        &self,
        user_id: i64,
        game_id: i64,
        title: &str,
    ) -> Result<GameTitle, StorageError>;

    async fn delete_game_title(&self, id: i64) -> Result<bool, StorageError>;
}
