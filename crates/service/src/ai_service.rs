use std::sync::Arc;

use questline_ai::placeholder::{self, Scenario};
use questline_ai::{AiClient, namespace_for};
use questline_core::{AI_SERVER_NOT_CONFIGURED, MessageRole, MessageType, NewMessage};
use questline_storage::StorageBackend;
use questline_storage::traits::{GameStore, MessageStore, SessionStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::session_service::dangling_session;
use crate::{non_empty, required};

/// Body of `POST /api/ai/dialogue`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub character_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub persisted: bool,
}

/// Connection hints handed to browser clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientHints {
    pub ai_server: Option<String>,
    pub ai_server_ws: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Placeholder game-master endpoints and the proxy to the external AI server.
pub struct AiService {
    storage: Arc<StorageBackend>,
    client: Option<AiClient>,
    hints: ClientHints,
}

impl AiService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, client: Option<AiClient>, ws_url: Option<String>) -> Self {
        let hints = ClientHints {
            ai_server: client.as_ref().map(|c| c.base_url().to_owned()),
            ai_server_ws: ws_url,
            namespace: None,
        };
        Self { storage, client, hints }
    }

    /// Canned reply; when tied to a known session both lines are stored as chat messages.
    pub async fn dialogue(&self, input: DialogueRequest) -> Result<DialogueReply, ServiceError> {
        let message = required(input.message.as_deref(), "message")?;
        let reply = placeholder::dialogue_reply(message, input.character_name.as_deref());

        let Some(session_id) = non_empty(input.session_id.as_deref()) else {
            return Ok(DialogueReply { reply, session_id: None, persisted: false });
        };
        if self.storage.get_session(session_id).await?.is_none() {
            return Err(ServiceError::not_found("session", session_id));
        }

        for (role, content) in [(MessageRole::User, message), (MessageRole::Assistant, reply.as_str())] {
            let line = NewMessage {
                session_id: session_id.to_owned(),
                role,
                message_type: MessageType::Chat,
                content: content.to_owned(),
            };
            self.storage.insert_message(&line).await.map_err(|e| dangling_session(e, session_id))?;
        }
        tracing::debug!(session_id = %session_id, "dialogue exchange stored");

        Ok(DialogueReply { reply, session_id: Some(session_id.to_owned()), persisted: true })
    }

    /// Opening scenario; a known game supplies the default title and genre.
    pub async fn scenario(
        &self,
        game_id: Option<&str>,
        title: Option<&str>,
        genre: Option<&str>,
    ) -> Result<Scenario, ServiceError> {
        let game = match non_empty(game_id) {
            Some(id) => self.storage.get_game(id).await?,
            None => None,
        };
        let title = non_empty(title).or_else(|| game.as_ref().map(|g| g.title.as_str()));
        let genre = non_empty(genre).or_else(|| game.as_ref().and_then(|g| g.genre.as_deref()));
        Ok(placeholder::scenario(title, genre))
    }

    pub fn image(&self, prompt: Option<&str>) -> Result<String, ServiceError> {
        let prompt = required(prompt, "prompt")?;
        Ok(placeholder::image_url(prompt))
    }

    /// Relay a session-start request to the AI server unchanged.
    pub async fn start_remote_session(&self, body: &Value) -> Result<Value, ServiceError> {
        let Some(client) = &self.client else {
            return Err(ServiceError::NotConfigured(AI_SERVER_NOT_CONFIGURED.to_owned()));
        };
        client.start_session(body).await.map_err(|e| {
            tracing::warn!(error = %e, "AI server session start failed");
            ServiceError::Ai(e)
        })
    }

    #[must_use]
    pub fn client_hints(&self, game_id: Option<&str>) -> ClientHints {
        ClientHints { namespace: non_empty(game_id).map(namespace_for), ..self.hints.clone() }
    }
}
