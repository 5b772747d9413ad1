//! Typed error enum for the service layer.
//!
//! Unifies storage, AI, and validation failures so handlers can map each
//! failure mode onto a status code without string matching.

use questline_ai::AiError;
use questline_core::CoreError;
use questline_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, duplicate, dangling reference, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Call to the external AI server failed.
    #[error("ai server: {0}")]
    Ai(#[from] AiError),

    /// Caller provided invalid input (missing field, bad enum value).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Missing, malformed, or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Unique value already taken (username, email, nickname).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Required collaborator (AI server) is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Storage(StorageError::NotFound { .. }))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Conflict(_)) || matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} '{id}'"))
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("io: {err}"))
    }
}
