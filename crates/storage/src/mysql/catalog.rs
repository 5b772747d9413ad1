//! CatalogStore and SaveSlotStore implementations for MySqlStorage.

use super::*;

use crate::traits::{CatalogStore, SaveSlotStore};
use async_trait::async_trait;
use questline_core::{
    CatalogGame, GameProgress, GameTitle, NewCatalogGame, NewPlayerCharacter, PlayerCharacter,
    SaveProgress,
};
use sqlx::types::Json;

const CATALOG_GAME_COLUMNS: &str = "id, title, description, genre, cover_image, created_at";
const PLAYER_CHARACTER_COLUMNS: &str = "id, user_id, game_id, name, class, attributes, created_at";
const PROGRESS_COLUMNS: &str = "id, user_id, game_id, character_id, chapter, data, updated_at";
const TITLE_COLUMNS: &str = "id, user_id, game_id, title, updated_at";

fn row_to_catalog_game(row: &MySqlRow) -> Result<CatalogGame, StorageError> {
    Ok(CatalogGame {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        genre: row.try_get("genre")?,
        cover_image: row.try_get("cover_image")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_player_character(row: &MySqlRow) -> Result<PlayerCharacter, StorageError> {
    Ok(PlayerCharacter {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        game_id: row.try_get("game_id")?,
        name: row.try_get("name")?,
        class: row.try_get("class")?,
        attributes: json_or(row, "attributes", serde_json::json!({}))?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_game_progress(row: &MySqlRow) -> Result<GameProgress, StorageError> {
    Ok(GameProgress {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        game_id: row.try_get("game_id")?,
        character_id: row.try_get("character_id")?,
        chapter: row.try_get("chapter")?,
        data: json_or(row, "data", serde_json::json!({}))?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_game_title(row: &MySqlRow) -> Result<GameTitle, StorageError> {
    Ok(GameTitle {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        game_id: row.try_get("game_id")?,
        title: row.try_get("title")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CatalogStore for MySqlStorage {
    async fn list_catalog_games(&self, limit: usize) -> Result<Vec<CatalogGame>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CATALOG_GAME_COLUMNS} FROM games ORDER BY id ASC LIMIT ?"
        ))
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_catalog_game).collect()
    }

    async fn get_catalog_game(&self, id: i64) -> Result<Option<CatalogGame>, StorageError> {
        let row = sqlx::query(&format!("SELECT {CATALOG_GAME_COLUMNS} FROM games WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_catalog_game(&r)).transpose()
    }

    async fn create_catalog_game(
        &self,
        game: &NewCatalogGame,
    ) -> Result<CatalogGame, StorageError> {
        let result = sqlx::query(
            "INSERT INTO games (title, description, genre, cover_image) VALUES (?, ?, ?, ?)",
        )
        .bind(&game.title)
        .bind(&game.description)
        .bind(&game.genre)
        .bind(&game.cover_image)
        .execute(&self.pool)
        .await?;
        let id = last_insert_id(&result);
        self.get_catalog_game(id)
            .await?
            .ok_or_else(|| StorageError::NotFound { entity: "game", id: id.to_string() })
    }

    async fn list_player_characters(
        &self,
        user_id: i64,
        game_id: Option<i64>,
    ) -> Result<Vec<PlayerCharacter>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAYER_CHARACTER_COLUMNS} FROM characters
             WHERE user_id = ? AND (? IS NULL OR game_id = ?)
             ORDER BY id ASC"
        ))
        .bind(user_id)
        .bind(game_id)
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_player_character).collect()
    }

    async fn get_player_character(
        &self,
        id: i64,
    ) -> Result<Option<PlayerCharacter>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {PLAYER_CHARACTER_COLUMNS} FROM characters WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_player_character(&r)).transpose()
    }

    async fn create_player_character(
        &self,
        character: &NewPlayerCharacter,
    ) -> Result<PlayerCharacter, StorageError> {
        let result = sqlx::query(
            "INSERT INTO characters (user_id, game_id, name, class, attributes)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(character.user_id)
        .bind(character.game_id)
        .bind(&character.name)
        .bind(&character.class)
        .bind(Json(&character.attributes))
        .execute(&self.pool)
        .await?;
        let id = last_insert_id(&result);
        self.get_player_character(id)
            .await?
            .ok_or_else(|| StorageError::NotFound { entity: "character", id: id.to_string() })
    }

    async fn delete_player_character(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SaveSlotStore for MySqlStorage {
    async fn get_game_progress(
        &self,
        user_id: i64,
        game_id: i64,
    ) -> Result<Option<GameProgress>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = ? AND game_id = ?"
        ))
        .bind(user_id)
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_game_progress(&r)).transpose()
    }

    async fn save_game_progress(&self, save: &SaveProgress) -> Result<GameProgress, StorageError> {
        sqlx::query(
            "INSERT INTO progress (user_id, game_id, character_id, chapter, data)
             VALUES (?, ?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE
               character_id = VALUES(character_id),
               chapter = VALUES(chapter),
               data = VALUES(data),
               updated_at = CURRENT_TIMESTAMP",
        )
        .bind(save.user_id)
        .bind(save.game_id)
        .bind(save.character_id)
        .bind(&save.chapter)
        .bind(Json(&save.data))
        .execute(&self.pool)
        .await?;
        self.get_game_progress(save.user_id, save.game_id).await?.ok_or_else(|| {
            StorageError::NotFound {
                entity: "progress",
                id: format!("{}/{}", save.user_id, save.game_id),
            }
        })
    }

    async fn list_game_titles(&self, user_id: i64) -> Result<Vec<GameTitle>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {TITLE_COLUMNS} FROM game_titles WHERE user_id = ? ORDER BY updated_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_game_title).collect()
    }

    async fn get_game_title(&self, id: i64) -> Result<Option<GameTitle>, StorageError> {
        let row = sqlx::query(&format!("SELECT {TITLE_COLUMNS} FROM game_titles WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_game_title(&r)).transpose()
    }

    async fn save_game_title(
        &self,
        user_id: i64,
        game_id: i64,
        title: &str,
    ) -> Result<GameTitle, StorageError> {
        sqlx::query(
            "INSERT INTO game_titles (user_id, game_id, title) VALUES (?, ?, ?)
             ON DUPLICATE KEY UPDATE title = VALUES(title), updated_at = CURRENT_TIMESTAMP",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(title)
        .execute(&self.pool)
        .await?;
        let row = sqlx::query(&format!(
            "SELECT {TITLE_COLUMNS} FROM game_titles WHERE user_id = ? AND game_id = ?"
        ))
        .bind(user_id)
        .bind(game_id)
        .fetch_one(&self.pool)
        .await?;
        row_to_game_title(&row)
    }

    async fn delete_game_title(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM game_titles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
