use std::sync::Arc;

use questline_core::{
    DEFAULT_QUERY_LIMIT, NewCharacter, ProgressCheckpoint, ProgressUpdate, Session,
    SessionProgress, SessionStart,
};
use questline_storage::traits::{ProgressStore, SessionStore};
use questline_storage::{StorageBackend, StorageError};
use serde::Deserialize;

use crate::character_service::CharacterService;
use crate::error::ServiceError;
use crate::{clamp_limit, non_empty, required};

/// Body of `POST /api/session/start`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    pub session_id: Option<String>,
    pub game_id: Option<String>,
    pub user_id: Option<String>,
    pub character_id: Option<String>,
}

pub struct SessionService {
    storage: Arc<StorageBackend>,
    characters: Arc<CharacterService>,
}

impl SessionService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>, characters: Arc<CharacterService>) -> Self {
        Self { storage, characters }
    }

    /// Create or reactivate a session, creating its game and character if needed.
    pub async fn start(&self, input: StartSession) -> Result<Session, ServiceError> {
        let game_id = required(input.game_id.as_deref(), "gameId")?;
        let user_id = required(input.user_id.as_deref(), "userId")?;
        let character_id = required(input.character_id.as_deref(), "characterId")?;
        let session_id = non_empty(input.session_id.as_deref())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_owned);

        self.characters
            .ensure_character(NewCharacter::new(character_id, game_id, user_id))
            .await?;

        if let Some(previous) = self.storage.get_session(&session_id).await? {
            tracing::info!(
                session_id = %session_id,
                previous_status = %previous.status,
                "reactivating existing session"
            );
            if previous.game_id != game_id
                || previous.user_id != user_id
                || previous.character_id != character_id
            {
                tracing::warn!(
                    session_id = %session_id,
                    stored_game = %previous.game_id,
                    stored_user = %previous.user_id,
                    stored_character = %previous.character_id,
                    "session restarted with different ids, keeping the stored ones"
                );
            }
        }

        let start = SessionStart {
            session_id,
            game_id: game_id.to_owned(),
            user_id: user_id.to_owned(),
            character_id: character_id.to_owned(),
        };
        Ok(self.storage.upsert_session(&start).await?)
    }

    pub async fn end(&self, session_id: Option<&str>) -> Result<Session, ServiceError> {
        let session_id = required(session_id, "sessionId")?;
        if !self.storage.end_session(session_id).await? {
            return Err(ServiceError::not_found("session", session_id));
        }
        tracing::info!(session_id = %session_id, "session ended");
        self.get(session_id).await
    }

    pub async fn get(&self, session_id: &str) -> Result<Session, ServiceError> {
        self.storage
            .get_session(session_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("session", session_id))
    }

    pub async fn list_for_user(
        &self,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Session>, ServiceError> {
        let user_id = required(user_id, "userId")?;
        let limit = clamp_limit(limit, DEFAULT_QUERY_LIMIT);
        Ok(self.storage.list_user_sessions(user_id, limit).await?)
    }

    pub async fn get_progress(&self, session_id: &str) -> Result<SessionProgress, ServiceError> {
        self.storage
            .get_progress(session_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("progress for session", session_id))
    }

    pub async fn update_progress(
        &self,
        session_id: &str,
        update: &ProgressUpdate,
    ) -> Result<SessionProgress, ServiceError> {
        self.get(session_id).await?;
        self.storage
            .upsert_progress(session_id, update)
            .await
            .map_err(|e| dangling_session(e, session_id))
    }

    pub async fn list_checkpoints(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProgressCheckpoint>, ServiceError> {
        self.get(session_id).await?;
        Ok(self.storage.list_checkpoints(session_id).await?)
    }

    pub async fn add_checkpoint(
        &self,
        session_id: &str,
        label: Option<&str>,
        state: Option<serde_json::Value>,
    ) -> Result<ProgressCheckpoint, ServiceError> {
        let label = required(label, "label")?;
        self.get(session_id).await?;
        let state = state.unwrap_or_else(|| serde_json::json!({}));
        self.storage
            .add_checkpoint(session_id, label, &state)
            .await
            .map_err(|e| dangling_session(e, session_id))
    }
}

/// A session deleted between the existence check and the write reads as 404.
pub(crate) fn dangling_session(err: StorageError, session_id: &str) -> ServiceError {
    if err.is_foreign_key() {
        ServiceError::not_found("session", session_id)
    } else {
        err.into()
    }
}
