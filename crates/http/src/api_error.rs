//! Typed API error for HTTP handlers.
//!
//! Converts service errors into HTTP responses with a JSON body and status code.
//! Handlers return `Result<Json<T>, ApiError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questline_service::ServiceError;
use questline_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` logs the real error server-side and returns a static message
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 401 Unauthorized: missing, invalid, or expired credentials.
    Unauthorized(String),
    /// 404 Not Found: requested resource doesn't exist.
    NotFound(String),
    /// 409 Conflict: unique value already taken.
    Conflict(String),
    /// 413 Payload Too Large: upload beyond the accepted size.
    PayloadTooLarge(String),
    /// 500 Internal Server Error: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
    /// 502 Bad Gateway: the external AI server failed.
    BadGateway(String),
    /// 503 Service Unavailable: required backend not configured.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::Unauthorized(msg) => Self::Unauthorized(msg),
            ServiceError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            ServiceError::Storage(StorageError::ForeignKey(what)) => {
                Self::NotFound(format!("referenced {what} not found"))
            },
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::Storage(ref e) if e.is_duplicate() => Self::Conflict(err.to_string()),
            ServiceError::PayloadTooLarge(msg) => Self::PayloadTooLarge(msg),
            ServiceError::NotConfigured(msg) => Self::ServiceUnavailable(msg),
            ServiceError::Ai(e) => {
                tracing::warn!(error = %e, "AI server request failed");
                Self::BadGateway("AI server request failed".to_owned())
            },
            other => Self::Internal(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_service_errors_map_to_status_codes() {
        assert_eq!(status_of(ServiceError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ServiceError::NotFound("session 's1'".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ServiceError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ServiceError::Storage(StorageError::Duplicate("k".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::Storage(StorageError::ForeignKey("ai_games 'g9'".into()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(ServiceError::PayloadTooLarge("x".into())), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(status_of(ServiceError::NotConfigured("x".into())), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(ServiceError::Ai(questline_ai::AiError::HttpStatus {
                code: 500,
                body: String::new()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(ServiceError::Internal("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
