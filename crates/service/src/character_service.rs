use std::sync::Arc;

use chrono::Utc;
use questline_core::{Character, Game, NewCharacter, NewGame};
use questline_storage::StorageBackend;
use questline_storage::traits::{CharacterStore, GameStore};

use crate::error::ServiceError;
use crate::required;

/// Lazy creation of games and characters on first reference.
///
/// Creation is lock-free: read, insert, and on a duplicate-key error from a
/// concurrent creator re-read the winner's row.
pub struct CharacterService {
    storage: Arc<StorageBackend>,
}

impl CharacterService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn ensure_game(&self, game: NewGame) -> Result<Game, ServiceError> {
        let game_id = required(Some(game.game_id.as_str()), "gameId")?.to_owned();
        if let Some(existing) = self.storage.get_game(&game_id).await? {
            return Ok(existing);
        }

        let row = NewGame { game_id: game_id.clone(), ..game }.into_game(Utc::now());
        match self.storage.insert_game(&row).await {
            Ok(()) => {
                tracing::info!(game_id = %game_id, "created game on first reference");
                Ok(row)
            },
            Err(e) if e.is_duplicate() => {
                tracing::debug!(game_id = %game_id, "game created concurrently, reusing it");
                self.storage
                    .get_game(&game_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("game", &game_id))
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Return the character, creating it when absent. The referenced game is
    /// always ensured, even when the character already exists under another game.
    ///
    /// An existing character is returned as stored; the supplied attributes
    /// only apply to a fresh row.
    pub async fn ensure_character(&self, character: NewCharacter) -> Result<Character, ServiceError> {
        let character_id = required(Some(character.character_id.as_str()), "characterId")?.to_owned();
        let game_id = required(Some(character.game_id.as_str()), "gameId")?.to_owned();
        required(Some(character.user_id.as_str()), "userId")?;

        self.ensure_game(NewGame::with_id(&game_id)).await?;
        if let Some(existing) = self.storage.get_character(&character_id).await? {
            return Ok(existing);
        }

        let row = NewCharacter { character_id: character_id.clone(), game_id, ..character }
            .into_character(Utc::now());
        match self.storage.insert_character(&row).await {
            Ok(()) => {
                tracing::info!(
                    character_id = %character_id,
                    health = row.health,
                    "created character on first reference"
                );
                Ok(row)
            },
            Err(e) if e.is_duplicate() => {
                tracing::debug!(character_id = %character_id, "character created concurrently, reusing it");
                self.storage
                    .get_character(&character_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("character", &character_id))
            },
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_character(&self, character_id: &str) -> Result<Character, ServiceError> {
        self.storage
            .get_character(character_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("character", character_id))
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Option<Game>, ServiceError> {
        Ok(self.storage.get_game(game_id).await?)
    }
}
