//! CharacterStore implementation for MySqlStorage.

use super::*;

use crate::traits::CharacterStore;
use async_trait::async_trait;
use sqlx::types::Json;

#[async_trait]
impl CharacterStore for MySqlStorage {
    async fn insert_character(&self, character: &Character) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO ai_characters ({CHARACTER_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&character.character_id)
        .bind(&character.game_id)
        .bind(&character.user_id)
        .bind(&character.name)
        .bind(&character.class)
        .bind(character.level)
        .bind(Json(&character.stats))
        .bind(Json(&character.inventory))
        .bind(&character.avatar)
        .bind(character.health)
        .bind(character.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_character(&self, character_id: &str) -> Result<Option<Character>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM ai_characters WHERE character_id = ?"
        ))
        .bind(character_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_character(&r)).transpose()
    }
}
