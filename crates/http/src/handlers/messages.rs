use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use questline_core::Message;
use questline_service::PostMessage;

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::query_types::MessagesQuery;
use crate::response_types::MessageCreatedResponse;

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<MessagesQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state
        .message_service
        .list(query.session_id.as_deref(), query.after_id, query.limit)
        .await?;
    Ok(Json(messages))
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PostMessage>,
) -> Result<(StatusCode, Json<MessageCreatedResponse>), ApiError> {
    let message = state.message_service.post(req).await?;
    Ok((StatusCode::CREATED, Json(MessageCreatedResponse { id: message.id })))
}
