//! Query result caching.
//!
//! A [`CacheStore`] is a plain byte store with per-key expiry. Expiry is
//! lazy: an expired entry is only noticed (and dropped) by the next `get`.
//! [`QueryCache`] sits on top and stores serialized index results.

use std::fmt;
use std::time::Duration;

use chrono::Utc;

use crate::error::Result;

pub mod memory;
pub mod query;
pub mod sqlite;

pub use memory::MemoryCacheStore;
pub use query::{QueryCache, DEFAULT_TTL, KEY_PREFIX};
pub use sqlite::SqliteCacheStore;

/// Byte store with expiring keys.
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Value for `key`, or `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key` for `ttl`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Delete every key starting with `prefix`, returning how many went.
    fn scan_delete(&self, prefix: &str) -> Result<usize>;

    /// Cheap liveness probe.
    fn ping(&self) -> bool;
}

/// Current time as unix epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Absolute expiry for an entry written now.
pub(crate) fn expires_at(ttl: Duration) -> i64 {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_millis().saturating_add(ttl_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at_is_in_the_future() {
        let before = now_millis();
        let at = expires_at(Duration::from_secs(60));
        assert!(at >= before + 60_000);
    }

    #[test]
    fn test_expires_at_saturates() {
        assert_eq!(expires_at(Duration::MAX), i64::MAX);
    }
}
