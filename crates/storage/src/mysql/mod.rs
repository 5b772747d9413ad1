//! MySQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod catalog;
mod characters;
mod conversations;
mod games;
mod messages;
mod progress;
mod sessions;
mod users;

use chrono::{DateTime, Utc};
use questline_core::{
    Character, ConversationLog, Game, Message, MessageRole, MessageType, ProgressCheckpoint,
    Session, SessionProgress, SessionStatus, User, DB_POOL_ACQUIRE_TIMEOUT_SECS,
    DB_POOL_IDLE_TIMEOUT_SECS, DB_POOL_MAX_CONNECTIONS,
};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};

use crate::error::StorageError;
use crate::migrations::ensure_core_tables;

#[derive(Clone, Debug)]
pub struct MySqlStorage {
    pool: MySqlPool,
}

impl MySqlStorage {
    /// Connect and ensure every table exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(DB_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(DB_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(DB_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        ensure_core_tables(&pool).await?;
        tracing::info!("MySqlStorage initialized");
        Ok(Self { pool })
    }
}

/// Decode a nullable JSON column, falling back to `default` for NULL.
pub(crate) fn json_or(
    row: &MySqlRow,
    column: &str,
    default: serde_json::Value,
) -> Result<serde_json::Value, StorageError> {
    Ok(row.try_get::<Option<serde_json::Value>, _>(column)?.unwrap_or(default))
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn last_insert_id(result: &sqlx::mysql::MySqlQueryResult) -> i64 {
    i64::try_from(result.last_insert_id()).unwrap_or(i64::MAX)
}

fn corrupt(context: String, source: questline_core::CoreError) -> StorageError {
    StorageError::DataCorruption { context, source: Box::new(source) }
}

pub(crate) fn row_to_game(row: &MySqlRow) -> Result<Game, StorageError> {
    Ok(Game {
        game_id: row.try_get("game_id")?,
        title: row.try_get("title")?,
        genre: row.try_get("genre")?,
        difficulty: row.try_get("difficulty")?,
        metadata: json_or(row, "metadata", serde_json::json!({}))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_character(row: &MySqlRow) -> Result<Character, StorageError> {
    Ok(Character {
        character_id: row.try_get("character_id")?,
        game_id: row.try_get("game_id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        class: row.try_get("class")?,
        level: row.try_get("level")?,
        stats: json_or(row, "stats", serde_json::json!({}))?,
        inventory: json_or(row, "inventory", serde_json::json!([]))?,
        avatar: row.try_get("avatar")?,
        health: row.try_get("health")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_session(row: &MySqlRow) -> Result<Session, StorageError> {
    let status_str: String = row.try_get("status")?;
    let status: SessionStatus = status_str
        .parse()
        .map_err(|e| corrupt(format!("session status '{status_str}'"), e))?;
    let ended_at: Option<DateTime<Utc>> = row.try_get("ended_at")?;
    Ok(Session {
        session_id: row.try_get("session_id")?,
        game_id: row.try_get("game_id")?,
        user_id: row.try_get("user_id")?,
        character_id: row.try_get("character_id")?,
        status,
        started_at: row.try_get("started_at")?,
        ended_at,
    })
}

pub(crate) fn row_to_message(row: &MySqlRow) -> Result<Message, StorageError> {
    let role_str: String = row.try_get("role")?;
    let role: MessageRole =
        role_str.parse().map_err(|e| corrupt(format!("message role '{role_str}'"), e))?;
    let type_str: String = row.try_get("type")?;
    let message_type: MessageType =
        type_str.parse().map_err(|e| corrupt(format!("message type '{type_str}'"), e))?;
    Ok(Message {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        role,
        message_type,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_conversation(row: &MySqlRow) -> Result<ConversationLog, StorageError> {
    let messages: serde_json::Value = row.try_get("messages")?;
    let messages = match messages {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        other => {
            tracing::warn!(kind = ?other, "conversation messages column is not an array");
            vec![other]
        },
    };
    Ok(ConversationLog {
        game_id: row.try_get("game_id")?,
        character_id: row.try_get("character_id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        messages,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_progress(row: &MySqlRow) -> Result<SessionProgress, StorageError> {
    Ok(SessionProgress {
        session_id: row.try_get("session_id")?,
        chapter: row.try_get("chapter")?,
        scene: row.try_get("scene")?,
        state: json_or(row, "state", serde_json::json!({}))?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_checkpoint(row: &MySqlRow) -> Result<ProgressCheckpoint, StorageError> {
    Ok(ProgressCheckpoint {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        label: row.try_get("label")?,
        state: json_or(row, "state", serde_json::json!({}))?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_user(row: &MySqlRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        nickname: row.try_get("nickname")?,
        avatar_url: row.try_get("avatar_url")?,
        bio: row.try_get("bio")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) const GAME_COLUMNS: &str =
    "game_id, title, genre, difficulty, metadata, created_at, updated_at";

pub(crate) const CHARACTER_COLUMNS: &str =
    "character_id, game_id, user_id, name, class, level, stats, inventory, avatar, health,
     created_at";

pub(crate) const SESSION_COLUMNS: &str =
    "session_id, game_id, user_id, character_id, status, started_at, ended_at";

pub(crate) const MESSAGE_COLUMNS: &str = "id, session_id, role, type, content, created_at";

pub(crate) const CONVERSATION_COLUMNS: &str =
    "game_id, character_id, user_id, title, messages, updated_at";

pub(crate) const USER_COLUMNS: &str =
    "id, username, email, password_hash, nickname, avatar_url, bio, created_at, updated_at";
