use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current position of a session in its scenario (`ai_session_progress`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionProgress {
    pub session_id: String,
    pub chapter: Option<String>,
    pub scene: Option<String>,
    pub state: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a session's progress. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub chapter: Option<String>,
    pub scene: Option<String>,
    pub state: Option<serde_json::Value>,
}

/// Append-only snapshot of session state (`ai_progress_checkpoints`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressCheckpoint {
    pub id: i64,
    pub session_id: String,
    pub label: String,
    pub state: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
