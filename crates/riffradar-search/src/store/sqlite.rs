//! SQLite-backed vector store.
//!
//! Vectors are stored as little-endian `f32` blobs with their dimension, and
//! metadata as a JSON object. Queries scan the whole collection in insertion
//! order and rank in memory, which is exact and fast enough for a song
//! catalog.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::{Error, Result};
use crate::schema::Database;
use crate::store::{
    nearest, squared_l2, validate_vector, CollectionHandle, Metadata, Neighbor, VectorStore,
};

/// A [`VectorStore`] persisted in a SQLite database.
#[derive(Debug)]
pub struct SqliteVectorStore {
    db: Mutex<Database>,
}

impl SqliteVectorStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    /// Open a throwaway in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    #[must_use]
    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| Error::Unavailable("vector store connection lock poisoned".to_string()))
    }
}

impl VectorStore for SqliteVectorStore {
    fn create_or_get_collection(&self, name: &str) -> Result<CollectionHandle> {
        let db = self.lock()?;
        db.conn().execute(
            "INSERT OR IGNORE INTO collections (name, created_at) VALUES (?1, ?2)",
            params![name, Utc::now().to_rfc3339()],
        )?;
        let id: i64 = db.conn().query_row(
            "SELECT id FROM collections WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(CollectionHandle {
            id,
            name: name.to_string(),
        })
    }

    fn insert(
        &self,
        collection: &CollectionHandle,
        id: &str,
        vector: &[f32],
        metadata: &Metadata,
    ) -> Result<()> {
        validate_vector(vector)?;
        let blob = encode_vector_blob(vector);
        let metadata_json = serde_json::to_string(metadata)?;
        let dimension = i64::try_from(vector.len())
            .map_err(|_| Error::InvalidVector("dimension overflows i64".to_string()))?;

        let mut db = self.lock()?;
        let tx = db.conn_mut().transaction()?;

        let live: bool = tx
            .query_row(
                "SELECT 1 FROM collections WHERE id = ?1",
                [collection.id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !live {
            return Err(Error::InvalidData(format!(
                "collection {} no longer exists",
                collection.name
            )));
        }

        let existing: Option<(Vec<u8>, String)> = tx
            .query_row(
                "SELECT vector, metadata FROM embeddings WHERE collection_id = ?1 AND id = ?2",
                params![collection.id, id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((existing_blob, existing_metadata)) = existing {
            let same_metadata = serde_json::from_str::<Metadata>(&existing_metadata)? == *metadata;
            if existing_blob == blob && same_metadata {
                return Ok(());
            }
            return Err(Error::DuplicateId {
                collection: collection.name.clone(),
                id: id.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO embeddings (collection_id, id, dimension, vector, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![collection.id, id, dimension, blob, metadata_json],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn query(
        &self,
        collection: &CollectionHandle,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<Neighbor>> {
        validate_vector(vector)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let dimension = i64::try_from(vector.len())
            .map_err(|_| Error::InvalidVector("dimension overflows i64".to_string()))?;

        let db = self.lock()?;
        let mut stmt = db.conn().prepare(
            "SELECT id, vector, metadata
             FROM embeddings
             WHERE collection_id = ?1 AND dimension = ?2
             ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![collection.id, dimension], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut candidates = Vec::new();
        for row in rows {
            let (id, blob, metadata_json) = row?;
            let stored = decode_vector_blob(&blob, vector.len())?;
            let Some(distance) = squared_l2(vector, &stored) else {
                continue;
            };
            candidates.push(Neighbor {
                id,
                distance,
                metadata: serde_json::from_str(&metadata_json)?,
            });
        }

        Ok(nearest(candidates, k))
    }

    fn count(&self, collection: &CollectionHandle) -> Result<usize> {
        let db = self.lock()?;
        let count: i64 = db.conn().query_row(
            "SELECT COUNT(*) FROM embeddings WHERE collection_id = ?1",
            [collection.id],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| Error::InvalidData(format!("negative row count: {count}")))
    }

    fn delete_collection(&self, name: &str) -> Result<()> {
        let mut db = self.lock()?;
        let tx = db.conn_mut().transaction()?;
        tx.execute(
            "DELETE FROM embeddings WHERE collection_id IN
                (SELECT id FROM collections WHERE name = ?1)",
            [name],
        )?;
        let removed = tx.execute("DELETE FROM collections WHERE name = ?1", [name])?;
        tx.commit()?;

        if removed > 0 {
            log::info!("Deleted collection {}", name);
        }
        Ok(())
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

fn encode_vector_blob(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(std::mem::size_of_val(vector));
    for &value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn decode_vector_blob(blob: &[u8], dimension: usize) -> Result<Vec<f32>> {
    let expected = dimension * std::mem::size_of::<f32>();
    if blob.len() != expected {
        return Err(Error::InvalidData(format!(
            "invalid vector byte length: expected {expected}, got {}",
            blob.len()
        )));
    }

    Ok(blob
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
