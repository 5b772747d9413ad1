use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_CHARACTER_NAME;

/// A player character row (`ai_characters`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub character_id: String,
    pub game_id: String,
    pub user_id: String,
    pub name: String,
    pub class: Option<String>,
    pub level: i32,
    pub stats: serde_json::Value,
    pub inventory: serde_json::Value,
    pub avatar: Option<String>,
    pub health: i32,
    pub created_at: DateTime<Utc>,
}

/// Attributes used when a character is created on first reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCharacter {
    pub character_id: String,
    pub game_id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub class: Option<String>,
    pub level: Option<i32>,
    pub stats: Option<serde_json::Value>,
    pub inventory: Option<serde_json::Value>,
    pub avatar: Option<String>,
}

impl NewCharacter {
    pub fn new(
        character_id: impl Into<String>,
        game_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            character_id: character_id.into(),
            game_id: game_id.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Materialize the row that an insert would create, including computed health.
    pub fn into_character(self, now: DateTime<Utc>) -> Character {
        let level = self.level.unwrap_or(1).max(1);
        let stats = self.stats.unwrap_or_else(|| serde_json::json!({}));
        let health = compute_health(level, &stats);
        Character {
            character_id: self.character_id,
            game_id: self.game_id,
            user_id: self.user_id,
            name: self.name.unwrap_or_else(|| DEFAULT_CHARACTER_NAME.to_owned()),
            class: self.class,
            level,
            stats,
            inventory: self.inventory.unwrap_or_else(|| serde_json::json!([])),
            avatar: self.avatar,
            health,
            created_at: now,
        }
    }
}

const BASE_HEALTH: i64 = 100;
const HEALTH_PER_LEVEL: i64 = 10;
const HEALTH_PER_CON_POINT: i64 = 5;
const BASELINE_CONSTITUTION: i64 = 10;

/// Hit points derived from level and the constitution stat.
///
/// Reads `constitution` (or `con`) from the stats object, defaulting to 10.
/// Never returns less than 1.
pub fn compute_health(level: i32, stats: &serde_json::Value) -> i32 {
    let con = stats
        .get("constitution")
        .or_else(|| stats.get("con"))
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(BASELINE_CONSTITUTION);
    let level = i64::from(level.max(1));
    let health = BASE_HEALTH
        .saturating_add((level - 1).saturating_mul(HEALTH_PER_LEVEL))
        .saturating_add((con - BASELINE_CONSTITUTION).saturating_mul(HEALTH_PER_CON_POINT));
    i32::try_from(health.max(1)).unwrap_or(i32::MAX)
}
