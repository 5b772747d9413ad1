use anyhow::{Context, Result};
use questline_core::AppConfig;
use questline_storage::StorageBackend;

/// Connecting runs the idempotent schema bootstrap.
pub(crate) async fn run(config: &AppConfig) -> Result<()> {
    let url = config.database_url.as_deref().context("DATABASE_URL must be set for init-db")?;
    StorageBackend::new_mysql(url).await.context("connecting to MySQL")?;
    println!("Schema ready");
    Ok(())
}
