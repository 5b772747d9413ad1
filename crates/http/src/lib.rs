//! HTTP API server for Questline.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::shadow_reuse, reason = "Shadowing for Arc clones is idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod api_types;
mod auth;
mod extract;
mod handlers;
mod query_types;
mod response_types;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use questline_ai::AiClient;
use questline_core::{AppConfig, MAX_AVATAR_BYTES};
use questline_service::{
    AiService, AuthService, CatalogService, CharacterService, ConversationService, Mailer,
    MessageService, ResetCodeCache, SessionService, TokenSigner, mailer_from_config,
};
use questline_storage::StorageBackend;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use api_error::ApiError;
pub use response_types::HealthResponse;

/// Shared application state for all HTTP handlers.
///
/// Wrapped in `Arc` for sharing across handlers.
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub message_service: Arc<MessageService>,
    pub conversation_service: Arc<ConversationService>,
    pub character_service: Arc<CharacterService>,
    pub auth_service: Arc<AuthService>,
    pub catalog_service: Arc<CatalogService>,
    pub ai_service: Arc<AiService>,
    /// Which storage backend is serving requests ("mysql" or "memory").
    pub backend: &'static str,
    pub upload_dir: PathBuf,
    pub cors_origin: Option<String>,
}

impl AppState {
    /// Wire every service onto one storage backend.
    ///
    /// An unusable AI server URL is logged and treated as unconfigured.
    pub fn new(storage: Arc<StorageBackend>, config: &AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let characters = Arc::new(CharacterService::new(Arc::clone(&storage)));
        let ai_client = config.ai_server_url.as_deref().and_then(|url| match AiClient::new(url) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "AI server disabled");
                None
            },
        });
        let auth = AuthService::new(
            Arc::clone(&storage),
            TokenSigner::new(&config.jwt_secret, questline_core::TOKEN_TTL_SECS),
            Arc::new(ResetCodeCache::new()),
            mailer,
            config.upload_dir.clone(),
        );

        Self {
            session_service: Arc::new(SessionService::new(
                Arc::clone(&storage),
                Arc::clone(&characters),
            )),
            message_service: Arc::new(MessageService::new(Arc::clone(&storage))),
            conversation_service: Arc::new(ConversationService::new(
                Arc::clone(&storage),
                Arc::clone(&characters),
            )),
            auth_service: Arc::new(auth),
            catalog_service: Arc::new(CatalogService::new(Arc::clone(&storage))),
            ai_service: Arc::new(AiService::new(
                Arc::clone(&storage),
                ai_client,
                config.ai_server_ws.clone(),
            )),
            character_service: characters,
            backend: storage.kind(),
            upload_dir: config.upload_dir.clone(),
            cors_origin: config.cors_origin.clone(),
        }
    }

    /// Same as [`Self::new`] with the mailer chosen from the mail settings.
    pub fn from_config(storage: Arc<StorageBackend>, config: &AppConfig) -> Self {
        Self::new(storage, config, mailer_from_config(config))
    }
}

/// Spawns background task that drops expired password reset codes.
pub fn start_reset_code_sweeper(cache: Arc<ResetCodeCache>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let pruned = cache.prune_expired();
            if pruned > 0 {
                tracing::debug!(pruned, "expired reset codes dropped");
            }
        }
    });
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.cors_origin.as_deref());
    let uploads = ServeDir::new(&state.upload_dir);

    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(handlers::sessions::list_sessions))
        .route("/api/session/start", post(handlers::sessions::start_session))
        .route("/api/session/end", post(handlers::sessions::end_session))
        .route("/api/session/{id}", get(handlers::sessions::get_session))
        .route(
            "/api/session/{id}/progress",
            get(handlers::sessions::get_progress).put(handlers::sessions::update_progress),
        )
        .route(
            "/api/session/{id}/checkpoints",
            get(handlers::sessions::list_checkpoints).post(handlers::sessions::add_checkpoint),
        )
        .route(
            "/api/messages",
            get(handlers::messages::list_messages).post(handlers::messages::post_message),
        )
        .route(
            "/api/conversations",
            get(handlers::conversations::list_conversations)
                .post(handlers::conversations::save_conversation),
        )
        .route(
            "/api/conversations/{game_id}/{character_id}",
            get(handlers::conversations::get_conversation)
                .delete(handlers::conversations::delete_conversation),
        )
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/profile", put(handlers::auth::update_profile))
        .route(
            "/api/auth/avatar",
            post(handlers::auth::upload_avatar)
                .layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES.saturating_mul(2))),
        )
        .route("/api/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/api/auth/verify-code", post(handlers::auth::verify_code))
        .route("/api/auth/reset-password", post(handlers::auth::reset_password))
        .route("/api/games", get(handlers::legacy::list_games).post(handlers::legacy::create_game))
        .route("/api/games/{id}", get(handlers::legacy::get_game))
        .route(
            "/api/characters",
            get(handlers::legacy::list_characters).post(handlers::legacy::create_character),
        )
        .route(
            "/api/characters/{id}",
            get(handlers::legacy::get_character).delete(handlers::legacy::delete_character),
        )
        .route(
            "/api/progress",
            get(handlers::legacy::get_progress).post(handlers::legacy::save_progress),
        )
        .route(
            "/api/game_titles",
            get(handlers::legacy::list_titles).post(handlers::legacy::save_title),
        )
        .route(
            "/api/game_titles/{id}",
            get(handlers::legacy::get_title).delete(handlers::legacy::delete_title),
        )
        .route("/api/ai/dialogue", post(handlers::ai::dialogue))
        .route("/api/ai/scenario", post(handlers::ai::scenario))
        .route("/api/ai/image", post(handlers::ai::image))
        .route("/api/ai/start", post(handlers::ai::start_remote_session))
        .route("/api/ai/config", get(handlers::ai::client_config))
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(AllowOrigin::exact(origin)).allow_credentials(true),
        Some(Err(_)) => {
            tracing::warn!("CORS_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        },
        None => layer.allow_origin(Any),
    }
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: state.backend,
        version: env!("CARGO_PKG_VERSION"),
    })
}
