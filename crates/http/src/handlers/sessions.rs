use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use questline_core::{ProgressCheckpoint, ProgressUpdate, Session, SessionProgress};
use questline_service::StartSession;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{CheckpointRequest, EndSessionRequest, ProgressRequest};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query_types::UserQuery;

pub async fn start_session(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<StartSession>,
) -> Result<Json<Session>, ApiError> {
    let session = state.session_service.start(req).await?;
    Ok(Json(session))
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<EndSessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state.session_service.end(req.session_id.as_deref()).await?;
    Ok(Json(session))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state.session_service.get(&id).await?;
    Ok(Json(session))
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let sessions =
        state.session_service.list_for_user(query.user_id.as_deref(), query.limit).await?;
    Ok(Json(sessions))
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<SessionProgress>, ApiError> {
    let progress = state.session_service.get_progress(&id).await?;
    Ok(Json(progress))
}

pub async fn update_progress(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<ProgressRequest>,
) -> Result<Json<SessionProgress>, ApiError> {
    let update = ProgressUpdate::from(req);
    let progress = state.session_service.update_progress(&id, &update).await?;
    Ok(Json(progress))
}

pub async fn list_checkpoints(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Vec<ProgressCheckpoint>>, ApiError> {
    let checkpoints = state.session_service.list_checkpoints(&id).await?;
    Ok(Json(checkpoints))
}

pub async fn add_checkpoint(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<CheckpointRequest>,
) -> Result<Json<ProgressCheckpoint>, ApiError> {
    let checkpoint =
        state.session_service.add_checkpoint(&id, req.label.as_deref(), req.state).await?;
    Ok(Json(checkpoint))
}
