use async_trait::async_trait;
use questline_core::Character;

use crate::error::StorageError;

/// Player character rows (`ai_characters`).
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Insert a new character.
    ///
    /// Fails with `Duplicate` if `character_id` exists and `ForeignKey` if the
    /// game does not.
    async fn insert_character(&self, character: &Character) -> Result<(), StorageError>;

    /// Get character by ID.
    async fn get_character(&self, character_id: &str) -> Result<Option<Character>, StorageError>;
}
