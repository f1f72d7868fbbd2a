use std::sync::Arc;

use anyhow::{Context, Result};
use riffradar_search::{CacheStore, QueryCache, SongIndex, SqliteCacheStore, SqliteVectorStore};
use riffradar_service::enrich::resilience::attempt_timeout;
use riffradar_service::{Config, Recommender, YouTubeClient};

pub mod cache;
pub mod config;
pub mod recommend;
pub mod seed;
pub mod status;

pub use cache::clear_cache;
pub use recommend::run_recommend;
pub use seed::run_seed;
pub use status::{show_health, show_stats};

/// Open the song index and query cache named in `config`.
///
/// Tutorials are attached only when `with_tutorials` is set and an API key
/// is configured.
pub fn open_recommender(config: &Config, with_tutorials: bool) -> Result<Recommender> {
    let store = SqliteVectorStore::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open song index at {}",
            config.database_path.display()
        )
    })?;
    let index = SongIndex::open(store).context("Failed to open songs collection")?;

    let cache_store: Arc<dyn CacheStore> = Arc::new(
        SqliteCacheStore::open(&config.cache_path).with_context(|| {
            format!("Failed to open query cache at {}", config.cache_path.display())
        })?,
    );
    let cache = QueryCache::new(cache_store).with_ttl(config.cache_ttl());

    let mut recommender = Recommender::new(Arc::new(index), cache)
        .with_enrichment_timeout(config.enrichment_timeout());

    if with_tutorials {
        match &config.youtube_api_key {
            Some(key) => {
                let client =
                    YouTubeClient::new(key.clone(), attempt_timeout(config.enrichment_timeout()))
                        .context("Failed to create YouTube client")?;
                recommender = recommender.with_tutorials(Arc::new(client));
            }
            None => log::debug!("No YouTube API key configured; skipping tutorials"),
        }
    }

    Ok(recommender)
}
