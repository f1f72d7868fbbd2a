//! In-memory vector store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::store::{
    nearest, squared_l2, validate_vector, CollectionHandle, Metadata, Neighbor, VectorStore,
};

#[derive(Debug)]
struct Row {
    id: String,
    vector: Vec<f32>,
    metadata: Metadata,
}

#[derive(Debug, Default)]
struct Collection {
    id: i64,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    collections: HashMap<String, Collection>,
}

impl State {
    fn rows(&self, handle: &CollectionHandle) -> &[Row] {
        self.collections
            .get(&handle.name)
            .filter(|c| c.id == handle.id)
            .map(|c| c.rows.as_slice())
            .unwrap_or(&[])
    }
}

/// A [`VectorStore`] held entirely in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    state: Mutex<State>,
}

impl MemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::Unavailable("memory vector store lock poisoned".to_string()))
    }
}

impl VectorStore for MemoryVectorStore {
    fn create_or_get_collection(&self, name: &str) -> Result<CollectionHandle> {
        let mut state = self.lock()?;
        if let Some(existing) = state.collections.get(name) {
            return Ok(CollectionHandle {
                id: existing.id,
                name: name.to_string(),
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        state.collections.insert(
            name.to_string(),
            Collection {
                id,
                rows: Vec::new(),
            },
        );
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
        let mut state = self.lock()?;
        let target = state
            .collections
            .get_mut(&collection.name)
            .filter(|c| c.id == collection.id)
            .ok_or_else(|| {
                Error::InvalidData(format!("collection {} no longer exists", collection.name))
            })?;

        if let Some(existing) = target.rows.iter().find(|row| row.id == id) {
            if existing.vector == vector && existing.metadata == *metadata {
                return Ok(());
            }
            return Err(Error::DuplicateId {
                collection: collection.name.clone(),
                id: id.to_string(),
            });
        }

        target.rows.push(Row {
            id: id.to_string(),
            vector: vector.to_vec(),
            metadata: metadata.clone(),
        });
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

        let state = self.lock()?;
        let candidates = state
            .rows(collection)
            .iter()
            .filter_map(|row| {
                squared_l2(vector, &row.vector).map(|distance| Neighbor {
                    id: row.id.clone(),
                    distance,
                    metadata: row.metadata.clone(),
                })
            })
            .collect();
        Ok(nearest(candidates, k))
    }

    fn count(&self, collection: &CollectionHandle) -> Result<usize> {
        Ok(self.lock()?.rows(collection).len())
    }

    fn delete_collection(&self, name: &str) -> Result<()> {
        self.lock()?.collections.remove(name);
        Ok(())
    }

    fn ping(&self) -> bool {
        self.state.lock().is_ok()
    }
}
