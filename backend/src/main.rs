//! Listing service entry point.

use std::sync::Arc;

use anyhow::Context;
use backend::api::{AppState, router};
use backend::cache::ResponseCache;
use backend::config::Config;
use backend::search_index::SearchIndexClient;
use common::listing::ListingPipeline;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if !config.is_search_configured() {
        warn!(
            "SEARCH_INDEX_URL / SEARCH_INDEX_APP_ID / SEARCH_INDEX_API_KEY not set, \
             listing routes will return 503"
        );
    }

    let cache = Arc::new(ResponseCache::with_system_clock(config.cache_ttl));
    let state = AppState {
        client: SearchIndexClient::new(&config, cache.clone())?,
        pipeline: ListingPipeline::new(config.page_size),
    };

    // expired entries are dropped on read; this keeps unread ones from piling up
    let purge_every = config.cache_ttl.max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        loop {
            interval.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!("SEARCH CACHE PURGED: {} entries", purged);
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
