//! Typed error enum for the AI crate.

use thiserror::Error;

/// Errors from calls to the external AI server.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid AI server URL: {0}")]
    InvalidUrl(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl AiError {
    /// Whether the upstream answered at all (as opposed to a network failure).
    #[must_use]
    pub const fn is_upstream_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }
}
