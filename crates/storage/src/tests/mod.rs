//! Test utilities and module declarations for storage tests.
//!
//! Exercised against `MemoryStorage`; the MySQL backend has its own
//! ignored integration suite under `tests/`.

use chrono::Utc;
use questline_core::{NewCharacter, NewGame, SessionStart};

use crate::traits::{CharacterStore, GameStore, SessionStore};
use crate::MemoryStorage;

pub fn create_test_storage() -> MemoryStorage {
    MemoryStorage::new()
}

pub async fn seed_game_and_character(storage: &MemoryStorage, game_id: &str, character_id: &str) {
    let now = Utc::now();
    if storage.get_game(game_id).await.unwrap().is_none() {
        storage.insert_game(&NewGame::with_id(game_id).into_game(now)).await.unwrap();
    }
    storage
        .insert_character(&NewCharacter::new(character_id, game_id, "user-1").into_character(now))
        .await
        .unwrap();
}

pub fn session_start(session_id: &str, game_id: &str, character_id: &str) -> SessionStart {
    SessionStart {
        session_id: session_id.to_owned(),
        game_id: game_id.to_owned(),
        user_id: "user-1".to_owned(),
        character_id: character_id.to_owned(),
    }
}

pub async fn seed_session(storage: &MemoryStorage, session_id: &str) {
    seed_game_and_character(storage, "game-1", &format!("char-{session_id}")).await;
    storage
        .upsert_session(&session_start(session_id, "game-1", &format!("char-{session_id}")))
        .await
        .unwrap();
}

mod user_tests;
