use std::str::FromStr;
use std::sync::Arc;

use questline_core::{DEFAULT_MESSAGE_LIMIT, Message, MessageRole, MessageType, NewMessage};
use questline_storage::StorageBackend;
use questline_storage::traits::{MessageStore, SessionStore};
use serde::Deserialize;

use crate::error::ServiceError;
use crate::session_service::dangling_session;
use crate::{clamp_limit, non_empty, required};

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessage {
    pub session_id: Option<String>,
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
}

pub struct MessageService {
    storage: Arc<StorageBackend>,
}

impl MessageService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Validate and append one message. Nothing is written unless every field checks out.
    pub async fn post(&self, input: PostMessage) -> Result<Message, ServiceError> {
        let session_id = required(input.session_id.as_deref(), "sessionId")?;
        let role = MessageRole::from_str(required(input.role.as_deref(), "role")?)?;
        let content = match input.content.as_deref() {
            Some(c) if !c.trim().is_empty() => c.to_owned(),
            _ => return Err(ServiceError::InvalidInput("content is required".to_owned())),
        };
        let message_type = match non_empty(input.message_type.as_deref()) {
            Some(t) => MessageType::from_str(t)?,
            None => MessageType::default(),
        };

        if self.storage.get_session(session_id).await?.is_none() {
            return Err(ServiceError::not_found("session", session_id));
        }

        let message =
            NewMessage { session_id: session_id.to_owned(), role, message_type, content };
        self.storage.insert_message(&message).await.map_err(|e| dangling_session(e, session_id))
    }

    /// Messages with `id > after_id`, ascending.
    pub async fn list(
        &self,
        session_id: Option<&str>,
        after_id: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, ServiceError> {
        let session_id = required(session_id, "sessionId")?;
        if self.storage.get_session(session_id).await?.is_none() {
            return Err(ServiceError::not_found("session", session_id));
        }
        let limit = clamp_limit(limit, DEFAULT_MESSAGE_LIMIT);
        Ok(self.storage.list_messages(session_id, after_id, limit).await?)
    }
}
