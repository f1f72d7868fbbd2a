//! Recommendation assembly.
//!
//! [`Recommender::recommend`] encodes the query, consults the query cache,
//! falls back to the similarity index on a miss, filters by
//! [`SIMILARITY_THRESHOLD`], and finally attaches tutorials. Only an index
//! failure fails the request. Cache trouble reads as a miss, and a failed
//! or slow tutorial lookup leaves that one recommendation without a
//! tutorial.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;

use riffradar_core::encoder::encode_detailed;
use riffradar_core::model::{Recommendation, SongRecord, Tutorial};
use riffradar_search::{QueryCache, SimilarityIndex};

use crate::enrich::resilience::with_deadline;
use crate::enrich::TutorialProvider;
use crate::error::{ServiceError, ServiceResult};

/// Matches whose rounded similarity is at or below this are dropped.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Decimal places similarity is rounded to before it is compared or
/// returned. The rounded value is the only one callers ever see.
pub const SCORE_DECIMALS: usize = 3;

/// Neighbors requested when the caller has no preference.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Time budget for a single tutorial lookup.
pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Round a raw similarity to [`SCORE_DECIMALS`] places.
///
/// Rounds the exact binary value, so `0.3005` (stored as 0.30049999...)
/// becomes `0.3`.
pub fn round_score(similarity: f64) -> f64 {
    format!("{:.*}", SCORE_DECIMALS, similarity)
        .parse()
        .unwrap_or(similarity)
}

/// Query text sent to the tutorial provider for a song.
pub fn tutorial_query(song_name: &str) -> String {
    format!("{song_name} guitar tutorial")
}

/// Catalog statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_songs: usize,
}

/// Liveness of the service's backing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    pub index_available: bool,
    pub cache_available: bool,
    /// `None` when the index could not be counted.
    pub total_songs: Option<usize>,
}

/// Produces ranked, enriched recommendations for a chord progression.
///
/// Holds shared handles to its index, cache, and tutorial provider; all of
/// them are supplied at construction.
#[derive(Debug, Clone)]
pub struct Recommender {
    index: Arc<dyn SimilarityIndex>,
    cache: QueryCache,
    tutorials: Option<Arc<dyn TutorialProvider>>,
    enrichment_timeout: Duration,
}

impl Recommender {
    pub fn new(index: Arc<dyn SimilarityIndex>, cache: QueryCache) -> Self {
        Self {
            index,
            cache,
            tutorials: None,
            enrichment_timeout: DEFAULT_ENRICHMENT_TIMEOUT,
        }
    }

    /// Attach tutorials from `provider` to every returned recommendation.
    #[must_use]
    pub fn with_tutorials(mut self, provider: Arc<dyn TutorialProvider>) -> Self {
        self.tutorials = Some(provider);
        self
    }

    #[must_use]
    pub fn with_enrichment_timeout(mut self, timeout: Duration) -> Self {
        self.enrichment_timeout = timeout;
        self
    }

    pub fn index(&self) -> &Arc<dyn SimilarityIndex> {
        &self.index
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Recommend songs similar to `chords`, best first.
    ///
    /// Returns an empty list when nothing clears the threshold.
    ///
    /// # Errors
    /// Returns [`ServiceError::Index`] if the similarity index cannot be
    /// queried. No partial results are returned in that case.
    ///
    /// [`ServiceError::Index`]: crate::error::ServiceError::Index
    pub async fn recommend<S>(
        &self,
        chords: &[S],
        max_results: usize,
    ) -> ServiceResult<Vec<Recommendation>>
    where
        S: AsRef<str> + Sync,
    {
        let encoding = encode_detailed(chords);
        if encoding.recognized == 0 {
            log::debug!(
                "No recognized chords in {} symbol(s); querying with a zero vector",
                chords.len()
            );
        }

        let matches = if let Some(cached) = self.cache.get(chords, max_results) {
            cached
        } else {
            let fresh = self.index.query(&encoding.vector, max_results)?;
            self.cache.put(chords, max_results, &fresh, None);
            fresh
        };

        let recommendations: Vec<Recommendation> = matches
            .into_iter()
            .filter_map(|hit| {
                let score = round_score(hit.similarity);
                (score > SIMILARITY_THRESHOLD).then(|| Recommendation::from_match(hit, score))
            })
            .collect();

        log::debug!(
            "{} recommendation(s) above threshold {}",
            recommendations.len(),
            SIMILARITY_THRESHOLD
        );

        Ok(self.enrich(recommendations).await)
    }

    /// Fetch tutorials for every recommendation concurrently. Order is
    /// preserved; failures leave the tutorial empty.
    async fn enrich(&self, recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        let Some(provider) = &self.tutorials else {
            return recommendations;
        };

        let mut tasks = JoinSet::new();
        for (position, rec) in recommendations.iter().enumerate() {
            let provider = Arc::clone(provider);
            let query = tutorial_query(&rec.song_name);
            let budget = self.enrichment_timeout;
            tasks.spawn(async move {
                let result =
                    with_deadline(provider.name(), budget, provider.search(&query)).await;
                (position, query, result)
            });
        }

        let mut tutorials: Vec<Option<Tutorial>> = vec![None; recommendations.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, _, Ok(tutorial))) => tutorials[position] = tutorial,
                Ok((_, query, Err(e))) => {
                    log::warn!("Tutorial lookup failed for {:?}: {}", query, e);
                }
                Err(e) => log::warn!("Tutorial lookup task failed: {}", e),
            }
        }

        recommendations
            .into_iter()
            .zip(tutorials)
            .map(|(rec, tutorial)| rec.with_tutorial(tutorial))
            .collect()
    }

    /// Number of songs in the catalog.
    ///
    /// # Errors
    /// Returns an error if the index cannot be counted.
    pub fn stats(&self) -> ServiceResult<Stats> {
        Ok(Stats {
            total_songs: self.index.count()?,
        })
    }

    /// Probe the index and the cache. Never fails.
    pub fn health(&self) -> Health {
        let total_songs = match self.index.count() {
            Ok(count) => Some(count),
            Err(e) => {
                log::warn!("Health check could not count songs: {}", e);
                None
            }
        };

        Health {
            index_available: total_songs.is_some() && self.index.is_available(),
            cache_available: self.cache.is_available(),
            total_songs,
        }
    }

    /// Add one song and drop every cached result.
    ///
    /// # Errors
    /// Returns [`ServiceError::Rejected`] for a duplicate id or bad vector,
    /// and [`ServiceError::Index`] if the index cannot be written.
    pub fn add_song(&self, record: &SongRecord) -> ServiceResult<()> {
        self.index.insert(record).map_err(ServiceError::from_insert)?;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Empty the catalog and drop every cached result.
    ///
    /// # Errors
    /// Returns an error if the index cannot be reset.
    pub fn reset(&self) -> ServiceResult<()> {
        self.index.reset()?;
        self.cache.invalidate_all();
        Ok(())
    }
}
