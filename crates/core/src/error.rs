use thiserror::Error;

/// Errors raised while parsing or validating domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid session status: {0}")]
    InvalidSessionStatus(String),

    #[error("invalid message role: {0}")]
    InvalidMessageRole(String),

    #[error("invalid message type: {0}")]
    InvalidMessageType(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
