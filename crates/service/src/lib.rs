//! Service layer for Questline
//!
//! Centralizes business logic between HTTP handlers and storage/ai.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod ai_service;
pub mod auth;
mod catalog_service;
mod character_service;
mod conversation_service;
pub mod error;
mod message_service;
mod session_service;
#[cfg(test)]
mod tests;

pub use ai_service::{AiService, ClientHints, DialogueReply, DialogueRequest};
pub use auth::{
    AuthService, Claims, LogMailer, LoginRequest, LoginResult, Mailer, RegisterUser,
    ResetCodeCache, SmtpMailer, TokenSigner, UpdateProfile, mailer_from_config,
};
pub use catalog_service::{
    CatalogService, CreateCatalogGame, CreatePlayerCharacter, SaveGameProgress, SaveGameTitle,
};
pub use character_service::CharacterService;
pub use conversation_service::{ConversationService, SaveConversation};
pub use error::ServiceError;
pub use message_service::{MessageService, PostMessage};
pub use session_service::{SessionService, StartSession};

/// Clamp a caller-supplied list size into `1..=MAX_QUERY_LIMIT`.
pub(crate) fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, questline_core::MAX_QUERY_LIMIT)
}

/// Trimmed, non-empty view of an optional string field.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A required string field: trimmed and non-empty, otherwise `InvalidInput`.
pub(crate) fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ServiceError> {
    non_empty(value).ok_or_else(|| ServiceError::InvalidInput(format!("{field} is required")))
}
