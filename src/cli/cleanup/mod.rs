//! Cleanup command - one-shot expiry sweep, suited to a cron job

use tracing::info;

/// Delete expired rows and report how many were removed
pub async fn run() -> anyhow::Result<()> {
    let config = super::prepare()?;

    let cache = crate::create_tool_cache(&config).await?;
    cache.initialize().await?;

    let deleted = cache.cleanup_expired().await;
    info!(deleted, collection = %config.cache.collection(), "Expired tool results removed");

    Ok(())
}
