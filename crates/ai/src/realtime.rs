//! Realtime event names shared with the browser client.
//!
//! The socket transport lives in the front-end. This module only fixes the
//! vocabulary: which server events exist, what their payloads carry, and
//! which commands a client may emit on a game's namespace.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const EVENT_STATUS: &str = "status";
pub const EVENT_GAME_RESPONSE: &str = "game_response";
pub const EVENT_MESSAGE: &str = "message";
pub const COMMAND_SEND_USER_MESSAGE: &str = "send_user_message";
pub const COMMAND_REQUEST_IMAGE: &str = "request_image";

/// Socket namespace for one game.
#[must_use]
pub fn namespace_for(game_id: &str) -> String {
    format!("/game/{}", game_id.trim().trim_matches('/'))
}

/// An event pushed by the AI server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RealtimeEvent {
    Status { status: String, detail: Option<String> },
    GameResponse { content: String, image_url: Option<String> },
    Message { role: String, content: String },
}

#[derive(Deserialize)]
struct StatusPayload {
    #[serde(alias = "state")]
    status: String,
    #[serde(default, alias = "message")]
    detail: Option<String>,
}

#[derive(Deserialize)]
struct GameResponsePayload {
    #[serde(alias = "text", alias = "response")]
    content: String,
    #[serde(default, alias = "imageUrl", alias = "image")]
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct MessagePayload {
    #[serde(default = "default_role")]
    role: String,
    #[serde(alias = "text")]
    content: String,
}

fn default_role() -> String {
    "assistant".to_owned()
}

impl RealtimeEvent {
    /// Map a named server event onto the typed enum.
    ///
    /// Unknown names and payloads missing their required field yield `None`.
    /// A bare string payload is accepted as the event's main field.
    #[must_use]
    pub fn from_server(name: &str, payload: &Value) -> Option<Self> {
        let text = payload.as_str().map(str::to_owned);
        match name {
            EVENT_STATUS => match text {
                Some(status) => Some(Self::Status { status, detail: None }),
                None => serde_json::from_value::<StatusPayload>(payload.clone())
                    .ok()
                    .map(|p| Self::Status { status: p.status, detail: p.detail }),
            },
            EVENT_GAME_RESPONSE => match text {
                Some(content) => Some(Self::GameResponse { content, image_url: None }),
                None => serde_json::from_value::<GameResponsePayload>(payload.clone())
                    .ok()
                    .map(|p| Self::GameResponse { content: p.content, image_url: p.image_url }),
            },
            EVENT_MESSAGE => match text {
                Some(content) => Some(Self::Message { role: default_role(), content }),
                None => serde_json::from_value::<MessagePayload>(payload.clone())
                    .ok()
                    .map(|p| Self::Message { role: p.role, content: p.content }),
            },
            other => {
                tracing::debug!(event = other, "ignoring unknown realtime event");
                None
            },
        }
    }

    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Status { .. } => EVENT_STATUS,
            Self::GameResponse { .. } => EVENT_GAME_RESPONSE,
            Self::Message { .. } => EVENT_MESSAGE,
        }
    }
}

/// A command a client emits on a game namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    SendUserMessage { session_id: String, content: String },
    RequestImage { session_id: String, prompt: String },
}

impl ClientCommand {
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::SendUserMessage { .. } => COMMAND_SEND_USER_MESSAGE,
            Self::RequestImage { .. } => COMMAND_REQUEST_IMAGE,
        }
    }

    /// Wire form: event name plus camelCase JSON payload.
    #[must_use]
    pub fn into_event(self) -> (&'static str, Value) {
        let name = self.event_name();
        let payload = match self {
            Self::SendUserMessage { session_id, content } => {
                json!({ "sessionId": session_id, "message": content })
            },
            Self::RequestImage { session_id, prompt } => {
                json!({ "sessionId": session_id, "prompt": prompt })
            },
        };
        (name, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_for() {
        assert_eq!(namespace_for("dragon-keep"), "/game/dragon-keep");
        assert_eq!(namespace_for("/dragon-keep/"), "/game/dragon-keep");
    }

    #[test]
    fn test_known_events_map() {
        let status = RealtimeEvent::from_server("status", &json!({"status": "thinking"}));
        assert_eq!(status, Some(RealtimeEvent::Status { status: "thinking".into(), detail: None }));

        let response = RealtimeEvent::from_server(
            "game_response",
            &json!({"text": "The door creaks.", "imageUrl": "http://img/1.png"}),
        );
        assert_eq!(
            response,
            Some(RealtimeEvent::GameResponse {
                content: "The door creaks.".into(),
                image_url: Some("http://img/1.png".into()),
            })
        );

        let message = RealtimeEvent::from_server("message", &json!("plain text"));
        assert_eq!(
            message,
            Some(RealtimeEvent::Message { role: "assistant".into(), content: "plain text".into() })
        );
    }

    #[test]
    fn test_unknown_or_malformed_events_are_dropped() {
        assert_eq!(RealtimeEvent::from_server("connect_error", &json!({})), None);
        assert_eq!(RealtimeEvent::from_server("game_response", &json!({"imageUrl": "x"})), None);
    }

    #[test]
    fn test_event_name_round_trips_through_from_server() {
        let event = RealtimeEvent::Status { status: "ready".into(), detail: Some("gm online".into()) };
        let payload = json!({"status": "ready", "detail": "gm online"});
        assert_eq!(RealtimeEvent::from_server(event.event_name(), &payload), Some(event));
    }

    #[test]
    fn test_client_command_wire_form() {
        let (name, payload) = ClientCommand::SendUserMessage {
            session_id: "s1".into(),
            content: "I search the chest".into(),
        }
        .into_event();
        assert_eq!(name, "send_user_message");
        assert_eq!(payload, json!({"sessionId": "s1", "message": "I search the chest"}));

        let (name, _) =
            ClientCommand::RequestImage { session_id: "s1".into(), prompt: "a chest".into() }
                .into_event();
        assert_eq!(name, "request_image");
    }
}
