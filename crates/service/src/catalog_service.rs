//! The older integer-keyed route family: catalog games, player characters,
//! save slots, and custom game titles.

use std::sync::Arc;

use questline_core::{
    CatalogGame, DEFAULT_QUERY_LIMIT, GameProgress, GameTitle, NewCatalogGame,
    NewPlayerCharacter, PlayerCharacter, SaveProgress,
};
use questline_storage::traits::{CatalogStore, SaveSlotStore};
use questline_storage::{StorageBackend, StorageError};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ServiceError;
use crate::{clamp_limit, non_empty, required};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogGame {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerCharacter {
    pub user_id: Option<i64>,
    pub game_id: Option<i64>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub attributes: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGameProgress {
    pub user_id: Option<i64>,
    pub game_id: Option<i64>,
    pub character_id: Option<i64>,
    pub chapter: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGameTitle {
    pub user_id: Option<i64>,
    pub game_id: Option<i64>,
    pub title: Option<String>,
}

fn required_id(value: Option<i64>, field: &str) -> Result<i64, ServiceError> {
    value.ok_or_else(|| ServiceError::InvalidInput(format!("{field} is required")))
}

fn unknown_game(err: StorageError, game_id: i64) -> ServiceError {
    if err.is_foreign_key() { ServiceError::not_found("game", game_id) } else { err.into() }
}

pub struct CatalogService {
    storage: Arc<StorageBackend>,
}

impl CatalogService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn list_games(&self, limit: Option<usize>) -> Result<Vec<CatalogGame>, ServiceError> {
        Ok(self.storage.list_catalog_games(clamp_limit(limit, DEFAULT_QUERY_LIMIT)).await?)
    }

    pub async fn get_game(&self, id: i64) -> Result<CatalogGame, ServiceError> {
        self.storage.get_catalog_game(id).await?.ok_or_else(|| ServiceError::not_found("game", id))
    }

    pub async fn create_game(&self, input: CreateCatalogGame) -> Result<CatalogGame, ServiceError> {
        let title = required(input.title.as_deref(), "title")?.to_owned();
        let game = NewCatalogGame {
            title,
            description: input.description,
            genre: input.genre,
            cover_image: input.cover_image,
        };
        Ok(self.storage.create_catalog_game(&game).await?)
    }

    pub async fn list_characters(
        &self,
        user_id: Option<i64>,
        game_id: Option<i64>,
    ) -> Result<Vec<PlayerCharacter>, ServiceError> {
        let user_id = required_id(user_id, "userId")?;
        Ok(self.storage.list_player_characters(user_id, game_id).await?)
    }

    pub async fn get_character(&self, id: i64) -> Result<PlayerCharacter, ServiceError> {
        self.storage
            .get_player_character(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("character", id))
    }

    pub async fn create_character(
        &self,
        input: CreatePlayerCharacter,
    ) -> Result<PlayerCharacter, ServiceError> {
        let user_id = required_id(input.user_id, "userId")?;
        let game_id = required_id(input.game_id, "gameId")?;
        let name = required(input.name.as_deref(), "name")?.to_owned();
        let character = NewPlayerCharacter {
            user_id,
            game_id,
            name,
            class: non_empty(input.class.as_deref()).map(str::to_owned),
            attributes: input.attributes.unwrap_or_else(|| serde_json::json!({})),
        };
        self.storage
            .create_player_character(&character)
            .await
            .map_err(|e| unknown_game(e, game_id))
    }

    pub async fn delete_character(&self, id: i64) -> Result<(), ServiceError> {
        if self.storage.delete_player_character(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("character", id))
        }
    }

    pub async fn get_progress(
        &self,
        user_id: Option<i64>,
        game_id: Option<i64>,
    ) -> Result<GameProgress, ServiceError> {
        let user_id = required_id(user_id, "userId")?;
        let game_id = required_id(game_id, "gameId")?;
        self.storage
            .get_game_progress(user_id, game_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("progress", format!("{user_id}/{game_id}")))
    }

    /// One save slot per (user, game); a later save overwrites it.
    pub async fn save_progress(&self, input: SaveGameProgress) -> Result<GameProgress, ServiceError> {
        let user_id = required_id(input.user_id, "userId")?;
        let game_id = required_id(input.game_id, "gameId")?;
        let save = SaveProgress {
            user_id,
            game_id,
            character_id: input.character_id,
            chapter: non_empty(input.chapter.as_deref()).map(str::to_owned),
            data: input.data.unwrap_or_else(|| serde_json::json!({})),
        };
        self.storage.save_game_progress(&save).await.map_err(|e| unknown_game(e, game_id))
    }

    pub async fn list_titles(&self, user_id: Option<i64>) -> Result<Vec<GameTitle>, ServiceError> {
        let user_id = required_id(user_id, "userId")?;
        Ok(self.storage.list_game_titles(user_id).await?)
    }

    pub async fn get_title(&self, id: i64) -> Result<GameTitle, ServiceError> {
        self.storage.get_game_title(id).await?.ok_or_else(|| ServiceError::not_found("game title", id))
    }

    pub async fn save_title(&self, input: SaveGameTitle) -> Result<GameTitle, ServiceError> {
        let user_id = required_id(input.user_id, "userId")?;
        let game_id = required_id(input.game_id, "gameId")?;
        let title = required(input.title.as_deref(), "title")?;
        self.storage
            .save_game_title(user_id, game_id, title)
            .await
            .map_err(|e| unknown_game(e, game_id))
    }

    pub async fn delete_title(&self, id: i64) -> Result<(), ServiceError> {
        if self.storage.delete_game_title(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("game title", id))
        }
    }
}
