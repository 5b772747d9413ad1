//! In-process storage backend.
//!
//! Mirrors the MySQL schema's keys and constraints (unique keys, foreign keys,
//! auto-increment ids) so services behave identically against either backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use questline_core::{
    CatalogGame, Character, ConversationLog, ConversationSummary, Game, GameProgress, GameTitle,
    Message, NewCatalogGame, NewMessage, NewPlayerCharacter, NewUser, PlayerCharacter,
    ProfileUpdate, ProgressCheckpoint, ProgressUpdate, SaveProgress, Session, SessionProgress,
    SessionStart, SessionStatus, User,
};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{
    CatalogStore, CharacterStore, ConversationStore, GameStore, MessageStore, ProgressStore,
    SaveSlotStore, SessionStore, UserStore,
};

#[derive(Default)]
struct Tables {
    games: HashMap<String, Game>,
    characters: HashMap<String, Character>,
    sessions: HashMap<String, Session>,
    messages: BTreeMap<i64, Message>,
    /// Row id kept across overwrites, as `ON DUPLICATE KEY UPDATE` does.
    conversations: HashMap<(String, String), (i64, ConversationLog)>,
    progress: HashMap<String, SessionProgress>,
    checkpoints: BTreeMap<i64, ProgressCheckpoint>,
    users: BTreeMap<i64, User>,
    catalog_games: BTreeMap<i64, CatalogGame>,
    player_characters: BTreeMap<i64, PlayerCharacter>,
    save_slots: HashMap<(i64, i64), GameProgress>,
    titles: BTreeMap<i64, GameTitle>,
    next_id: i64,
}

impl Tables {
    /// Shared auto-increment counter; ids only need to grow per table.
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn nickname_taken(&self, nickname: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.nickname.as_deref() == Some(nickname))
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage").finish_non_exhaustive()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStorage {
    async fn insert_game(&self, game: &Game) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if tables.games.contains_key(&game.game_id) {
            return Err(StorageError::Duplicate(format!("ai_games.PRIMARY '{}'", game.game_id)));
        }
        tables.games.insert(game.game_id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError> {
        Ok(self.tables.read().await.games.get(game_id).cloned())
    }
}

#[async_trait]
impl CharacterStore for MemoryStorage {
    async fn insert_character(&self, character: &Character) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if tables.characters.contains_key(&character.character_id) {
            return Err(StorageError::Duplicate(format!(
                "ai_characters.PRIMARY '{}'",
                character.character_id
            )));
        }
        if !tables.games.contains_key(&character.game_id) {
            return Err(StorageError::ForeignKey(format!("ai_games '{}'", character.game_id)));
        }
        tables.characters.insert(character.character_id.clone(), character.clone());
        Ok(())
    }

    async fn get_character(&self, character_id: &str) -> Result<Option<Character>, StorageError> {
        Ok(self.tables.read().await.characters.get(character_id).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStorage {
    async fn upsert_session(&self, start: &SessionStart) -> Result<Session, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(&start.game_id) {
            return Err(StorageError::ForeignKey(format!("ai_games '{}'", start.game_id)));
        }
        if !tables.characters.contains_key(&start.character_id) {
            return Err(StorageError::ForeignKey(format!(
                "ai_characters '{}'",
                start.character_id
            )));
        }
        // Reactivation keeps the stored ids, like ON DUPLICATE KEY UPDATE.
        if let Some(existing) = tables.sessions.get_mut(&start.session_id) {
            existing.status = SessionStatus::Active;
            existing.ended_at = None;
            return Ok(existing.clone());
        }
        let session = Session {
            session_id: start.session_id.clone(),
            game_id: start.game_id.clone(),
            user_id: start.user_id.clone(),
            character_id: start.character_id.clone(),
            status: SessionStatus::Active,
            started_at: Utc::now(),
            ended_at: None,
        };
        tables.sessions.insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StorageError> {
        Ok(self.tables.read().await.sessions.get(session_id).cloned())
    }

    async fn end_session(&self, session_id: &str) -> Result<bool, StorageError> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get_mut(session_id) {
            Some(session) => {
                session.status = SessionStatus::Ended;
                session.ended_at = Some(Utc::now());
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn list_user_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Session>, StorageError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<Session> =
            tables.sessions.values().filter(|s| s.user_id == user_id).cloned().collect();
        sessions.sort_by(|a, b| {
            b.started_at.cmp(&a.started_at).then_with(|| a.session_id.cmp(&b.session_id))
        });
        sessions.truncate(limit);
        Ok(sessions)
    }
}

#[async_trait]
impl MessageStore for MemoryStorage {
    async fn insert_message(&self, message: &NewMessage) -> Result<Message, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.sessions.contains_key(&message.session_id) {
            return Err(StorageError::ForeignKey(format!("ai_sessions '{}'", message.session_id)));
        }
        let id = tables.next_id();
        let stored = Message {
            id,
            session_id: message.session_id.clone(),
            role: message.role,
            message_type: message.message_type,
            content: message.content.clone(),
            created_at: Utc::now(),
        };
        tables.messages.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_messages(
        &self,
        session_id: &str,
        after_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        let tables = self.tables.read().await;
        let floor = after_id.unwrap_or(0);
        Ok(tables
            .messages
            .range(floor.saturating_add(1)..)
            .map(|(_, m)| m)
            .filter(|m| m.session_id == session_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ConversationStore for MemoryStorage {
    async fn save_conversation(&self, log: &ConversationLog) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(&log.game_id) {
            return Err(StorageError::ForeignKey(format!("ai_games '{}'", log.game_id)));
        }
        if !tables.characters.contains_key(&log.character_id) {
            return Err(StorageError::ForeignKey(format!("ai_characters '{}'", log.character_id)));
        }
        let mut stored = log.clone();
        stored.updated_at = Utc::now();
        let key = (log.game_id.clone(), log.character_id.clone());
        let id = match tables.conversations.get(&key) {
            Some((id, _)) => *id,
            None => tables.next_id(),
        };
        tables.conversations.insert(key, (id, stored));
        Ok(())
    }

    async fn get_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<Option<ConversationLog>, StorageError> {
        let key = (game_id.to_owned(), character_id.to_owned());
        Ok(self.tables.read().await.conversations.get(&key).map(|(_, log)| log.clone()))
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, StorageError> {
        let tables = self.tables.read().await;
        let mut logs: Vec<&(i64, ConversationLog)> =
            tables.conversations.values().filter(|(_, c)| c.user_id == user_id).collect();
        logs.sort_by(|(a_id, a), (b_id, b)| {
            b.updated_at.cmp(&a.updated_at).then_with(|| b_id.cmp(a_id))
        });
        Ok(logs.into_iter().take(limit).map(|(_, log)| ConversationSummary::from(log)).collect())
    }

    async fn delete_conversation(
        &self,
        game_id: &str,
        character_id: &str,
    ) -> Result<bool, StorageError> {
        let key = (game_id.to_owned(), character_id.to_owned());
        Ok(self.tables.write().await.conversations.remove(&key).is_some())
    }
}

#[async_trait]
impl ProgressStore for MemoryStorage {
    async fn upsert_progress(
        &self,
        session_id: &str,
        update: &ProgressUpdate,
    ) -> Result<SessionProgress, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.sessions.contains_key(session_id) {
            return Err(StorageError::ForeignKey(format!("ai_sessions '{session_id}'")));
        }
        let now = Utc::now();
        let progress = tables.progress.entry(session_id.to_owned()).or_insert_with(|| {
            SessionProgress {
                session_id: session_id.to_owned(),
                chapter: None,
                scene: None,
                state: serde_json::json!({}),
                updated_at: now,
            }
        });
        if let Some(chapter) = &update.chapter {
            progress.chapter = Some(chapter.clone());
        }
        if let Some(scene) = &update.scene {
            progress.scene = Some(scene.clone());
        }
        if let Some(state) = &update.state {
            progress.state = state.clone();
        }
        progress.updated_at = now;
        Ok(progress.clone())
    }

    async fn get_progress(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionProgress>, StorageError> {
        Ok(self.tables.read().await.progress.get(session_id).cloned())
    }

    async fn add_checkpoint(
        &self,
        session_id: &str,
        label: &str,
        state: &serde_json::Value,
    ) -> Result<ProgressCheckpoint, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.sessions.contains_key(session_id) {
            return Err(StorageError::ForeignKey(format!("ai_sessions '{session_id}'")));
        }
        let id = tables.next_id();
        let checkpoint = ProgressCheckpoint {
            id,
            session_id: session_id.to_owned(),
            label: label.to_owned(),
            state: state.clone(),
            created_at: Utc::now(),
        };
        tables.checkpoints.insert(id, checkpoint.clone());
        Ok(checkpoint)
    }

    async fn list_checkpoints(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProgressCheckpoint>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.checkpoints.values().filter(|c| c.session_id == session_id).cloned().collect())
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::Duplicate(format!("users.username '{}'", user.username)));
        }
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StorageError::Duplicate(format!("users.email '{}'", user.email)));
        }
        if let Some(nickname) = &user.nickname {
            if tables.nickname_taken(nickname, None) {
                return Err(StorageError::Duplicate(format!("users.nickname '{nickname}'")));
            }
        }
        let now = Utc::now();
        let id = tables.next_id();
        let stored = User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            nickname: user.nickname.clone(),
            avatar_url: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_login(&self, account: &str) -> Result<Option<User>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == account || u.email.eq_ignore_ascii_case(account))
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StorageError> {
        let mut tables = self.tables.write().await;
        if let Some(nickname) = &update.nickname {
            if tables.nickname_taken(nickname, Some(id)) {
                return Err(StorageError::Duplicate(format!("users.nickname '{nickname}'")));
            }
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(nickname) = &update.nickname {
            user.nickname = Some(nickname.clone());
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar_url) = &update.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StorageError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_owned();
                user.updated_at = Utc::now();
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStorage {
    async fn list_catalog_games(&self, limit: usize) -> Result<Vec<CatalogGame>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.catalog_games.values().take(limit).cloned().collect())
    }

    async fn get_catalog_game(&self, id: i64) -> Result<Option<CatalogGame>, StorageError> {
        Ok(self.tables.read().await.catalog_games.get(&id).cloned())
    }

    async fn create_catalog_game(
        &self,
        game: &NewCatalogGame,
    ) -> Result<CatalogGame, StorageError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let stored = CatalogGame {
            id,
            title: game.title.clone(),
            description: game.description.clone(),
            genre: game.genre.clone(),
            cover_image: game.cover_image.clone(),
            created_at: Utc::now(),
        };
        tables.catalog_games.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_player_characters(
        &self,
        user_id: i64,
        game_id: Option<i64>,
    ) -> Result<Vec<PlayerCharacter>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .player_characters
            .values()
            .filter(|c| c.user_id == user_id && game_id.is_none_or(|g| c.game_id == g))
            .cloned()
            .collect())
    }

    async fn get_player_character(
        &self,
        id: i64,
    ) -> Result<Option<PlayerCharacter>, StorageError> {
        Ok(self.tables.read().await.player_characters.get(&id).cloned())
    }

    async fn create_player_character(
        &self,
        character: &NewPlayerCharacter,
    ) -> Result<PlayerCharacter, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.catalog_games.contains_key(&character.game_id) {
            return Err(StorageError::ForeignKey(format!("games '{}'", character.game_id)));
        }
        let id = tables.next_id();
        let stored = PlayerCharacter {
            id,
            user_id: character.user_id,
            game_id: character.game_id,
            name: character.name.clone(),
            class: character.class.clone(),
            attributes: character.attributes.clone(),
            created_at: Utc::now(),
        };
        tables.player_characters.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_player_character(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.tables.write().await.player_characters.remove(&id).is_some())
    }
}

#[async_trait]
impl SaveSlotStore for MemoryStorage {
    async fn get_game_progress(
        &self,
        user_id: i64,
        game_id: i64,
    ) -> Result<Option<GameProgress>, StorageError> {
        Ok(self.tables.read().await.save_slots.get(&(user_id, game_id)).cloned())
    }

    async fn save_game_progress(&self, save: &SaveProgress) -> Result<GameProgress, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.catalog_games.contains_key(&save.game_id) {
            return Err(StorageError::ForeignKey(format!("games '{}'", save.game_id)));
        }
        let key = (save.user_id, save.game_id);
        let id = match tables.save_slots.get(&key) {
            Some(existing) => existing.id,
            None => tables.next_id(),
        };
        let stored = GameProgress {
            id,
            user_id: save.user_id,
            game_id: save.game_id,
            character_id: save.character_id,
            chapter: save.chapter.clone(),
            data: save.data.clone(),
            updated_at: Utc::now(),
        };
        tables.save_slots.insert(key, stored.clone());
        Ok(stored)
    }

    async fn list_game_titles(&self, user_id: i64) -> Result<Vec<GameTitle>, StorageError> {
        let tables = self.tables.read().await;
        let mut titles: Vec<GameTitle> =
            tables.titles.values().filter(|t| t.user_id == user_id).cloned().collect();
        titles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
        Ok(titles)
    }

    async fn get_game_title(&self, id: i64) -> Result<Option<GameTitle>, StorageError> {
        Ok(self.tables.read().await.titles.get(&id).cloned())
    }

    async fn save_game_title(
        &self,
        user_id: i64,
        game_id: i64,
        title: &str,
    ) -> Result<GameTitle, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.catalog_games.contains_key(&game_id) {
            return Err(StorageError::ForeignKey(format!("games '{game_id}'")));
        }
        let now = Utc::now();
        if let Some(existing) =
            tables.titles.values_mut().find(|t| t.user_id == user_id && t.game_id == game_id)
        {
            existing.title = title.to_owned();
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let id = tables.next_id();
        let stored = GameTitle { id, user_id, game_id, title: title.to_owned(), updated_at: now };
        tables.titles.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_game_title(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.tables.write().await.titles.remove(&id).is_some())
    }
}
