use serde_json::Value;

use crate::error::AiError;

/// Upper bound on a proxied call to the AI server.
pub const PROXY_TIMEOUT_SECS: u64 = 30;

const SESSION_START_PATH: &str = "/api/session/start";
const MAX_ERROR_BODY_LEN: usize = 500;

/// Client for the external AI/Flask server.
///
/// Single attempt per call: failures are surfaced to the caller, never retried.
#[derive(Debug, Clone)]
pub struct AiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AiClient {
    /// Creates a client for the AI server rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, AiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AiError::InvalidUrl(base_url));
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(PROXY_TIMEOUT_SECS))
            .build()
            .map_err(|e| AiError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a session-start payload and return the server's JSON verbatim.
    ///
    /// # Errors
    /// Returns an error on network failure, a non-success status, or a body
    /// that is not JSON.
    pub async fn start_session(&self, body: &Value) -> Result<Value, AiError> {
        self.post_json(SESSION_START_PATH, body).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, AiError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "proxying to AI server");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "AI server returned an error");
            return Err(AiError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY_LEN).to_owned(),
            });
        }

        serde_json::from_str(&text).map_err(|e| AiError::JsonParse {
            context: format!("response from {path} (body: {})", truncate(&text, 200)),
            source: e,
        })
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub(crate) fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    s.get(..end).unwrap_or("")
}
