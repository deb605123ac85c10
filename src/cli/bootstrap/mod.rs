//! Bootstrap command - prepares the vector collection for a deployment

use tracing::info;

/// Bootstrap the cache, failing the process when the collection cannot be prepared
pub async fn run() -> anyhow::Result<()> {
    let config = super::prepare()?;

    let cache = crate::create_tool_cache(&config).await?;
    let dimensions = cache.initialize().await?;

    info!(
        collection = %config.cache.collection(),
        dimensions,
        "Tool cache collection ready"
    );

    Ok(())
}
