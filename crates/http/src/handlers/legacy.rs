//! Integer-keyed game catalog routes kept for the older front-end pages.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use questline_core::{CatalogGame, GameProgress, GameTitle, PlayerCharacter};
use questline_service::{CreateCatalogGame, CreatePlayerCharacter, SaveGameProgress, SaveGameTitle};

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query_types::{LegacyQuery, LimitQuery};
use crate::response_types::SuccessResponse;

pub async fn list_games(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<Vec<CatalogGame>>, ApiError> {
    let games = state.catalog_service.list_games(query.limit).await?;
    Ok(Json(games))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<CatalogGame>, ApiError> {
    let game = state.catalog_service.get_game(id).await?;
    Ok(Json(game))
}

pub async fn create_game(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCatalogGame>,
) -> Result<(StatusCode, Json<CatalogGame>), ApiError> {
    let game = state.catalog_service.create_game(req).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LegacyQuery>,
) -> Result<Json<Vec<PlayerCharacter>>, ApiError> {
    let characters = state.catalog_service.list_characters(query.user_id, query.game_id).await?;
    Ok(Json(characters))
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PlayerCharacter>, ApiError> {
    let character = state.catalog_service.get_character(id).await?;
    Ok(Json(character))
}

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePlayerCharacter>,
) -> Result<(StatusCode, Json<PlayerCharacter>), ApiError> {
    let character = state.catalog_service.create_character(req).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog_service.delete_character(id).await?;
    Ok(Json(SuccessResponse::ok("character deleted")))
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LegacyQuery>,
) -> Result<Json<GameProgress>, ApiError> {
    let progress = state.catalog_service.get_progress(query.user_id, query.game_id).await?;
    Ok(Json(progress))
}

pub async fn save_progress(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveGameProgress>,
) -> Result<Json<GameProgress>, ApiError> {
    let progress = state.catalog_service.save_progress(req).await?;
    Ok(Json(progress))
}

pub async fn list_titles(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LegacyQuery>,
) -> Result<Json<Vec<GameTitle>>, ApiError> {
    let titles = state.catalog_service.list_titles(query.user_id).await?;
    Ok(Json(titles))
}

pub async fn get_title(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<GameTitle>, ApiError> {
    let title = state.catalog_service.get_title(id).await?;
    Ok(Json(title))
}

pub async fn save_title(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveGameTitle>,
) -> Result<Json<GameTitle>, ApiError> {
    let title = state.catalog_service.save_title(req).await?;
    Ok(Json(title))
}

pub async fn delete_title(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog_service.delete_title(id).await?;
    Ok(Json(SuccessResponse::ok("title deleted")))
}
