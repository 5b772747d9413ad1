use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use questline_core::{ConversationLog, ConversationSummary};
use questline_service::SaveConversation;

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query_types::UserQuery;
use crate::response_types::SuccessResponse;

pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let logs = state.conversation_service.list(query.user_id.as_deref(), query.limit).await?;
    Ok(Json(logs))
}

pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    ApiPath((game_id, character_id)): ApiPath<(String, String)>,
) -> Result<Json<ConversationLog>, ApiError> {
    let log = state.conversation_service.get(&game_id, &character_id).await?;
    Ok(Json(log))
}

pub async fn save_conversation(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveConversation>,
) -> Result<Json<ConversationLog>, ApiError> {
    let log = state.conversation_service.save(req).await?;
    Ok(Json(log))
}

pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    ApiPath((game_id, character_id)): ApiPath<(String, String)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.conversation_service.delete(&game_id, &character_id).await?;
    Ok(Json(SuccessResponse::ok("conversation deleted")))
}
