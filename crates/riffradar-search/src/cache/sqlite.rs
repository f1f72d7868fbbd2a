//! SQLite-backed cache store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, OptionalExtension};

use crate::cache::{expires_at, now_millis, CacheStore};
use crate::error::{Error, Result};
use crate::schema::Database;

/// A [`CacheStore`] persisted in the `cache_entries` table, so cached
/// results survive between CLI invocations.
#[derive(Debug)]
pub struct SqliteCacheStore {
    db: Mutex<Database>,
}

impl SqliteCacheStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            db: Mutex::new(Database::open(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            db: Mutex::new(Database::open_in_memory()?),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| Error::Unavailable("cache connection lock poisoned".to_string()))
    }
}

impl CacheStore for SqliteCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let db = self.lock()?;
        let row: Option<(Vec<u8>, i64)> = db
            .conn()
            .query_row(
                "SELECT value, expires_at FROM cache_entries WHERE key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((value, expires)) if expires > now_millis() => Ok(Some(value)),
            Some(_) => {
                db.conn()
                    .execute("DELETE FROM cache_entries WHERE key = ?1", [key])?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.lock()?.conn().execute(
            "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at(ttl)],
        )?;
        Ok(())
    }

    fn scan_delete(&self, prefix: &str) -> Result<usize> {
        // substr() instead of LIKE so '%' and '_' in the prefix are literal.
        let deleted = self.lock()?.conn().execute(
            "DELETE FROM cache_entries WHERE substr(key, 1, length(?1)) = ?1",
            [prefix],
        )?;
        Ok(deleted)
    }

    fn ping(&self) -> bool {
        self.lock()
            .and_then(|db| {
                db.conn()
                    .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(Error::from)
            })
            .is_ok()
    }
}
