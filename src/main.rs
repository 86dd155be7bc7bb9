//! Memocache demo harness
//!
//! Exercises the cache through its public API: restores a snapshot if one is
//! configured, performs a few writes and lookups, then saves and shuts down.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memocache::{Cache, CacheError, Config, Expiration, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memocache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, sweep_interval={}s, snapshot={:?}",
        config.default_ttl, config.sweep_interval, config.snapshot_path
    );

    let cache: Cache<Value> = Cache::from_config(&config).context("failed to create cache")?;

    if let Some(path) = config.snapshot_path.as_ref().filter(|p| p.exists()) {
        let installed = cache
            .load_from_file(path)
            .await
            .with_context(|| format!("failed to restore snapshot from {}", path.display()))?;
        info!("Restored {} live entries from snapshot", installed);
    }

    let runs = match cache.get("demo:runs").await {
        Some(Value::Int(n)) => n + 1,
        _ => 1,
    };
    cache.set("demo:runs", runs, Expiration::Never).await;
    cache
        .set("demo:session", "ephemeral", Expiration::After(Duration::from_secs(5)))
        .await;

    match cache.add("demo:runs", 0i64, Expiration::Never).await {
        Err(CacheError::AlreadyExists(key)) => info!("Add rejected for live key {}", key),
        other => warn!("Unexpected add result: {:?}", other),
    }
    cache
        .replace("demo:session", "refreshed", Expiration::Default)
        .await
        .context("session entry should still be live")?;

    let stats = cache.stats().await;
    info!(
        "Run #{}: entries={}, hits={}, misses={}",
        runs, stats.total_entries, stats.hits, stats.misses
    );

    if let Some(path) = &config.snapshot_path {
        cache
            .save_to_file(path)
            .await
            .with_context(|| format!("failed to save snapshot to {}", path.display()))?;
    }

    cache.stop_sweep()?;
    info!("Shutdown complete");
    Ok(())
}
