use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use questline_core::PublicUser;
use questline_service::{LoginRequest, LoginResult, RegisterUser, UpdateProfile};

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{ForgotPasswordRequest, ResetPasswordRequest, VerifyCodeRequest};
use crate::auth::AuthUser;
use crate::extract::ApiJson;
use crate::response_types::SuccessResponse;

const AVATAR_FIELD: &str = "avatar";

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterUser>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let user = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    let result = state.auth_service.login(req).await?;
    Ok(Json(result))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.auth_service.me(user.user_id).await?;
    Ok(Json(user))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<UpdateProfile>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.auth_service.update_profile(user.user_id, req).await?;
    Ok(Json(user))
}

/// Reads the `avatar` part of a multipart upload; other parts are skipped.
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| ApiError::BadRequest(format!("expected multipart form: {e}")))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let updated = state
            .auth_service
            .upload_avatar(user.user_id, content_type.as_deref(), &bytes)
            .await?;
        return Ok(Json(updated));
    }
    Err(ApiError::BadRequest("avatar file is required".to_owned()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.auth_service.forgot_password(req.email.as_deref()).await?;
    Ok(Json(SuccessResponse::ok("verification code sent")))
}

pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VerifyCodeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.auth_service.verify_code(req.email.as_deref(), req.code.as_deref())?;
    Ok(Json(SuccessResponse::ok("code verified")))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .auth_service
        .reset_password(req.email.as_deref(), req.code.as_deref(), req.new_password.as_deref())
        .await?;
    Ok(Json(SuccessResponse::ok("password reset")))
}
