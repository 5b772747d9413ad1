use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use questline_ai::placeholder::Scenario;
use questline_service::{ClientHints, DialogueReply, DialogueRequest};
use serde_json::Value;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{ImageRequest, ScenarioRequest};
use crate::extract::{ApiJson, ApiQuery};
use crate::query_types::ConfigQuery;
use crate::response_types::ImageResponse;

pub async fn dialogue(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DialogueRequest>,
) -> Result<Json<DialogueReply>, ApiError> {
    let reply = state.ai_service.dialogue(req).await?;
    Ok(Json(reply))
}

/// Every field is optional, so a request without a JSON body is accepted.
pub async fn scenario(
    State(state): State<Arc<AppState>>,
    req: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Result<Json<Scenario>, ApiError> {
    let req = match req {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => ScenarioRequest::default(),
        Err(e) => return Err(e.into()),
    };
    let scenario = state
        .ai_service
        .scenario(req.game_id.as_deref(), req.title.as_deref(), req.genre.as_deref())
        .await?;
    Ok(Json(scenario))
}

pub async fn image(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let url = state.ai_service.image(req.prompt.as_deref())?;
    Ok(Json(ImageResponse { url }))
}

pub async fn start_remote_session(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let relayed = state.ai_service.start_remote_session(&body).await?;
    Ok(Json(relayed))
}

pub async fn client_config(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ConfigQuery>,
) -> Json<ClientHints> {
    Json(state.ai_service.client_hints(query.game_id.as_deref()))
}
