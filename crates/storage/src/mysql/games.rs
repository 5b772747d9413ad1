//! GameStore implementation for MySqlStorage.

use super::*;

use crate::traits::GameStore;
use async_trait::async_trait;
use sqlx::types::Json;

#[async_trait]
impl GameStore for MySqlStorage {
    async fn insert_game(&self, game: &Game) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO ai_games ({GAME_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&game.game_id)
        .bind(&game.title)
        .bind(&game.genre)
        .bind(&game.difficulty)
        .bind(Json(&game.metadata))
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError> {
        let row = sqlx::query(&format!("SELECT {GAME_COLUMNS} FROM ai_games WHERE game_id = ?"))
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_game(&r)).transpose()
    }
}
