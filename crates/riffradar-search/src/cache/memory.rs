//! In-memory cache store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::cache::{expires_at, now_millis, CacheStore};
use crate::error::{Error, Result};

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: i64,
}

/// A [`CacheStore`] backed by a `HashMap`. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Unavailable("memory cache lock poisoned".to_string()))
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.lock()?;
        let value = match entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now_millis() => return Ok(Some(entry.value.clone())),
            Some(_) => None,
        };
        entries.remove(key);
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.lock()?.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: expires_at(ttl),
            },
        );
        Ok(())
    }

    fn scan_delete(&self, prefix: &str) -> Result<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }

    fn ping(&self) -> bool {
        self.entries.lock().is_ok()
    }
}
