use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use watchlist::{
    cache::{create_redis_client, Cache},
    config::Config,
    routes::{create_router, AppState},
    services::{MetadataClient, TmdbProvider},
    store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Artifacts are fatal: refuse to serve without a catalog
    let artifact_client = reqwest::Client::builder()
        .timeout(config.artifact_timeout())
        .build()?;
    let store = store::load(&config, &artifact_client).await?;

    let mut provider = TmdbProvider::from_config(&config)?;
    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(create_redis_client(redis_url)?);
        provider = provider.with_cache(cache, config.metadata_cache_ttl_secs);
        cache_writer = Some(handle);
        tracing::info!("Metadata cache enabled");
    }
    let metadata: Arc<dyn MetadataClient> = Arc::new(provider);

    let state = AppState::from_config(&config, store, metadata);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
