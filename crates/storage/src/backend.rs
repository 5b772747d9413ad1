//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use questline_core::{
    CatalogGame, Character, ConversationLog, ConversationSummary, Game, GameProgress, GameTitle,
    Message, NewCatalogGame, NewMessage, NewPlayerCharacter, NewUser, PlayerCharacter,
    ProfileUpdate, ProgressCheckpoint, ProgressUpdate, SaveProgress, Session, SessionProgress,
    SessionStart, User,
};

use crate::error::StorageError;
use crate::traits::{
    CatalogStore, CharacterStore, ConversationStore, GameStore, MessageStore, ProgressStore,
    SaveSlotStore, SessionStore, UserStore,
};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::MySql(s) => <crate::MySqlStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Memory(s) => <crate::MemoryStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    MySql(crate::MySqlStorage),
    Memory(crate::MemoryStorage),
}

impl StorageBackend {
    pub async fn new_mysql(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::MySql(crate::MySqlStorage::new(database_url).await?))
    }

    pub fn new_memory() -> Self {
        Self::Memory(crate::MemoryStorage::new())
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MySql(_) => "mysql",
            Self::Memory(_) => "memory",
        }
    }
}

// ── GameStore ────────────────────────────────────────────────────

#[async_trait]
impl GameStore for StorageBackend {
    async fn insert_game(&self, game: &Game) -> Result<(), StorageError> {
        dispatch!(self, GameStore, insert_game(game))
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError> {
        dispatch!(self, GameStore, get_game(game_id))
    }
}

// ── CharacterStore ───────────────────────────────────────────────

#[async_trait]
impl CharacterStore for StorageBackend {
    async fn insert_character(&self, character: &Character) -> Result<(), StorageError> {
        dispatch!(self, CharacterStore, insert_character(character))
    }

    async fn get_character(&self, character_id: &str) -> Result<Option<Character>, StorageError> {
        dispatch!(self, CharacterStore, get_character(character_id))
    }
}

// ── SessionStore ─────────────────────────────────────────────────

#[async_trait]
impl SessionStore for StorageBackend {
    async fn upsert_session(&self, start: &SessionStart) -> Result<Session, StorageError> {
        dispatch!(self, SessionStore, upsert_session(start))
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StorageError> {
        dispatch!(self, SessionStore, get_session(session_id))
    }

    async fn end_session(&self, session_id: &str) -> Result<bool, StorageError> {
        dispatch!(self, SessionStore, end_session(session_id))
    }

    async fn list_user_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Session>, StorageError> {
        dispatch!(self, SessionStore, list_user_sessions(user_id, limit))
    }
}

// ── MessageStore ─────────────────────────────────────────────────

#[async_trait]
impl MessageStore for StorageBackend {
    async fn insert_message(&self, message: &NewMessage) -> Result<Message, StorageError> {
        dispatch!(self, MessageStore, insert_message(message))
    }

    async fn list_messages(
        &self,
        session_id: &str,
        after_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        dispatch!(self, MessageStore, list_messages(session_id, after_id, limit))
    }
}

// ── ConversationStore ────────────────────────────────────────────

#[async_trait]
impl ConversationStore for StorageBackend {
    async fn save_conversation(&self, log: &ConversationLog) -> Result<(), StorageError> {
        dispatch!(self, ConversationStore, save_conversation(log))
    }

    async fn get_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<Option<ConversationLog>, StorageError> {
        dispatch!(self, ConversationStore, get_conversation(game_id, character_id))
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, StorageError> {
        dispatch!(self, ConversationStore, list_conversations(user_id, limit))
    }

    async fn delete_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<bool, StorageError> {
        dispatch!(self, ConversationStore, delete_conversation(game_id, character_id))
    }
}

// ── ProgressStore ────────────────────────────────────────────────

#[async_trait]
impl ProgressStore for StorageBackend {
    async fn upsert_progress(
        &self,
        session_id: &str,
        update: &ProgressUpdate,
    ) -> Result<SessionProgress, StorageError> {
        dispatch!(self, ProgressStore, upsert_progress(session_id, update))
    }

    async fn get_progress(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionProgress>, StorageError> {
        dispatch!(self, ProgressStore, get_progress(session_id))
    }

    async fn add_checkpoint(
        &self,
        session_id: &str,
        label: &str,
        state: &serde_json::Value,
    ) -> Result<ProgressCheckpoint, StorageError> {
        dispatch!(self, ProgressStore, add_checkpoint(session_id, label, state))
    }

    async fn list_checkpoints(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProgressCheckpoint>, StorageError> {
        dispatch!(self, ProgressStore, list_checkpoints(session_id))
    }
}

// ── UserStore ────────────────────────────────────────────────────

#[async_trait]
impl UserStore for StorageBackend {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        dispatch!(self, UserStore, create_user(user))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        dispatch!(self, UserStore, get_user(id))
    }

    async fn find_user_by_login(&self, account: &str) -> Result<Option<User>, StorageError> {
        dispatch!(self, UserStore, find_user_by_login(account))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        dispatch!(self, UserStore, find_user_by_email(email))
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StorageError> {
        dispatch!(self, UserStore, update_profile(id, update))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StorageError> {
        dispatch!(self, UserStore, update_password(id, password_hash))
    }
}

// ── CatalogStore ─────────────────────────────────────────────────

#[async_trait]
impl CatalogStore for StorageBackend {
    async fn list_catalog_games(&self, limit: usize) -> Result<Vec<CatalogGame>, StorageError> {
        dispatch!(self, CatalogStore, list_catalog_games(limit))
    }

    async fn get_catalog_game(&self, id: i64) -> Result<Option<CatalogGame>, StorageError> {
        dispatch!(self, CatalogStore, get_catalog_game(id))
    }

    async fn create_catalog_game(
        &self,
        game: &NewCatalogGame,
    ) -> Result<CatalogGame, StorageError> {
        dispatch!(self, CatalogStore, create_catalog_game(game))
    }

    async fn list_player_characters(
        &self,
        user_id: i64,
        game_id: Option<i64>,
    ) -> Result<Vec<PlayerCharacter>, StorageError> {
        dispatch!(self, CatalogStore, list_player_characters(user_id, game_id))
    }

    async fn get_player_character(
        &self,
        id: i64,
    ) -> Result<Option<PlayerCharacter>, StorageError> {
        dispatch!(self, CatalogStore, get_player_character(id))
    }

    async fn create_player_character(
        &self,
        character: &NewPlayerCharacter,
    ) -> Result<PlayerCharacter, StorageError> {
        dispatch!(self, CatalogStore, create_player_character(character))
    }

    async fn delete_player_character(&self, id: i64) -> Result<bool, StorageError> {
        dispatch!(self, CatalogStore, delete_player_character(id))
    }
}

// ── SaveSlotStore ────────────────────────────────────────────────

#[async_trait]
impl SaveSlotStore for StorageBackend {
    async fn get_game_progress(
        &self,
        user_id: i64,
        game_id: i64,
    ) -> Result<Option<GameProgress>, StorageError> {
        dispatch!(self, SaveSlotStore, get_game_progress(user_id, game_id))
    }

    async fn save_game_progress(&self, save: &SaveProgress) -> Result<GameProgress, StorageError> {
        dispatch!(self, SaveSlotStore, save_game_progress(save))
    }

    async fn list_game_titles(&self, user_id: i64) -> Result<Vec<GameTitle>, StorageError> {
        dispatch!(self, SaveSlotStore, list_game_titles(user_id))
    }

    async fn get_game_title(&self, id: i64) -> Result<Option<GameTitle>, StorageError> {
        dispatch!(self, SaveSlotStore, get_game_title(id))
    }

    async fn save_game_title(
        &self,
        user_id: i64,
        game_id: i64,
        title: &str,
    ) -> Result<GameTitle, StorageError> {
        dispatch!(self, SaveSlotStore, save_game_title(user_id, game_id, title))
    }

    async fn delete_game_title(&self, id: i64) -> Result<bool, StorageError> {
        dispatch!(self, SaveSlotStore, delete_game_title(id))
    }
}
