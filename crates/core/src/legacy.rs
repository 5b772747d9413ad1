//! Rows of the older `games`/`characters`/`progress`/`game_titles` tables.
//!
//! These overlap with the `ai_*` tables and are served by a parallel route family.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogGame {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCatalogGame {
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerCharacter {
    pub id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub name: String,
    pub class: Option<String>,
    pub attributes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPlayerCharacter {
    pub user_id: i64,
    pub game_id: i64,
    pub name: String,
    pub class: Option<String>,
    pub attributes: serde_json::Value,
}

/// Save slot: one row per (user, game).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameProgress {
    pub id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub character_id: Option<i64>,
    pub chapter: Option<String>,
    pub data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SaveProgress {
    pub user_id: i64,
    pub game_id: i64,
    pub character_id: Option<i64>,
    pub chapter: Option<String>,
    pub data: serde_json::Value,
}

/// A user's custom title for a game: one row per (user, game).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameTitle {
    pub id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}
