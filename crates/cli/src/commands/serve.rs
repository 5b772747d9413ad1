use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use questline_core::{AppConfig, RESET_CODE_SWEEP_INTERVAL_SECS, env_parse_with_default};
use questline_http::{AppState, create_router, start_reset_code_sweeper};
use questline_storage::StorageBackend;

pub(crate) async fn run(
    mut config: AppConfig,
    port: Option<u16>,
    host: Option<String>,
    memory: bool,
) -> Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    let storage = if memory {
        tracing::warn!("using in-memory storage, data is lost on exit");
        StorageBackend::new_memory()
    } else {
        let url = config
            .database_url
            .as_deref()
            .context("DATABASE_URL must be set (or pass --memory)")?;
        StorageBackend::new_mysql(url).await.context("connecting to MySQL")?
    };

    if config.ai_server_url.is_none() {
        tracing::info!("AI_SERVER_URL not set, /api/ai/start will answer 503");
    }
    if !config.mail_configured() {
        tracing::info!("MAIL_USER/MAIL_PASS not set, reset codes are written to the log");
    }

    let state = Arc::new(AppState::from_config(Arc::new(storage), &config));

    let sweep_secs =
        env_parse_with_default("RESET_CODE_SWEEP_INTERVAL_SECS", RESET_CODE_SWEEP_INTERVAL_SECS);
    start_reset_code_sweeper(
        Arc::clone(state.auth_service.reset_codes()),
        Duration::from_secs(sweep_secs.max(1)),
    );

    let router = create_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, router).await?;

    Ok(())
}
