//! Memoization of similarity index results.
//!
//! Keys are derived from the *sorted* chord list plus the requested result
//! count, so `["C", "G", "Am"]` and `["Am", "C", "G"]` share an entry even
//! though they encode to different vectors. That matches the behavior
//! existing deployments rely on.
//!
//! Every operation is best-effort: store failures are logged and reported
//! as a miss (or silently skipped for writes). Nothing here invalidates
//! itself when the index changes; whoever mutates the index must call
//! [`QueryCache::invalidate_all`].

use std::sync::Arc;
use std::time::Duration;

use riffradar_core::model::ScoredMatch;
use sha2::{Digest, Sha256};

use crate::cache::CacheStore;

/// Namespace for every key written by [`QueryCache`].
pub const KEY_PREFIX: &str = "riffradar:query:";

/// Default lifetime of a cached result set.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache of `(chords, k) -> [ScoredMatch]`.
#[derive(Debug, Clone)]
pub struct QueryCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache key for a query: prefix + SHA-256 of `"<sorted,chords>:<k>"`.
    pub fn key<S: AsRef<str>>(chords: &[S], k: usize) -> String {
        let mut sorted: Vec<&str> = chords.iter().map(|c| c.as_ref()).collect();
        sorted.sort_unstable();
        let input = format!("{}:{}", sorted.join(","), k);
        format!("{}{:x}", KEY_PREFIX, Sha256::digest(input.as_bytes()))
    }

    /// Cached results, or `None` on a miss, an expired entry, or any store
    /// or decoding failure.
    pub fn get<S: AsRef<str>>(&self, chords: &[S], k: usize) -> Option<Vec<ScoredMatch>> {
        let key = Self::key(chords, k);
        let bytes = match self.store.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Cache get failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(results) => {
                log::debug!("Cache hit for {}", key);
                Some(results)
            }
            Err(e) => {
                log::warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Store results for a query. `ttl` overrides the cache default.
    pub fn put<S: AsRef<str>>(
        &self,
        chords: &[S],
        k: usize,
        results: &[ScoredMatch],
        ttl: Option<Duration>,
    ) {
        let key = Self::key(chords, k);
        let bytes = match serde_json::to_vec(results) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &bytes, ttl.unwrap_or(self.ttl)) {
            log::warn!("Cache set failed for {}: {}", key, e);
        }
    }

    /// Drop every cached query result. Returns how many entries went, or
    /// zero if the store could not be reached.
    pub fn invalidate_all(&self) -> usize {
        match self.store.scan_delete(KEY_PREFIX) {
            Ok(count) => {
                log::debug!("Invalidated {} cached queries", count);
                count
            }
            Err(e) => {
                log::warn!("Cache invalidation failed: {}", e);
                0
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.ping()
    }
}
