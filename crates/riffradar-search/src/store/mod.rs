//! Vector store engines.
//!
//! A [`VectorStore`] keeps named collections of `(id, vector, metadata)`
//! rows and answers exact nearest-neighbor queries by squared Euclidean
//! distance. Ties keep insertion order.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

/// Flat string metadata stored next to each vector.
pub type Metadata = BTreeMap<String, String>;

/// Reference to a collection returned by
/// [`VectorStore::create_or_get_collection`].
///
/// A handle outlives its collection: after the collection is deleted the
/// handle still works but sees no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHandle {
    pub id: i64,
    pub name: String,
}

/// One nearest-neighbor hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub distance: f64,
    pub metadata: Metadata,
}

/// Storage engine for vectors.
///
/// Every method is atomic with respect to the others on the same store.
pub trait VectorStore: Send + Sync + fmt::Debug {
    /// Return the named collection, creating it if needed.
    fn create_or_get_collection(&self, name: &str) -> Result<CollectionHandle>;

    /// Insert one row.
    ///
    /// Re-inserting an id with identical vector and metadata is a no-op;
    /// re-inserting it with different data fails with
    /// [`Error::DuplicateId`].
    fn insert(
        &self,
        collection: &CollectionHandle,
        id: &str,
        vector: &[f32],
        metadata: &Metadata,
    ) -> Result<()>;

    /// Up to `k` rows closest to `vector`, nearest first.
    fn query(&self, collection: &CollectionHandle, vector: &[f32], k: usize)
        -> Result<Vec<Neighbor>>;

    /// Number of rows in the collection.
    fn count(&self, collection: &CollectionHandle) -> Result<usize>;

    /// Drop the named collection and all of its rows. Missing collections
    /// are ignored.
    fn delete_collection(&self, name: &str) -> Result<()>;

    /// Cheap liveness probe.
    fn ping(&self) -> bool {
        true
    }
}

/// Squared Euclidean distance, or `None` when the lengths differ.
pub fn squared_l2(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(
        a.iter()
            .zip(b)
            .map(|(&x, &y)| {
                let d = f64::from(x) - f64::from(y);
                d * d
            })
            .sum(),
    )
}

/// Reject vectors the distance metric cannot handle.
pub(crate) fn validate_vector(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(Error::InvalidVector("vector is empty".to_string()));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidVector(
            "vector contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

/// Rank candidates that are already in insertion order. The sort is
/// stable, so equal distances keep that order.
pub(crate) fn nearest(mut candidates: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate(k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(id: &str, distance: f64) -> Neighbor {
        Neighbor {
            id: id.to_string(),
            distance,
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), Some(25.0));
        assert_eq!(squared_l2(&[1.0, 2.0], &[1.0, 2.0]), Some(0.0));
        assert_eq!(squared_l2(&[1.0], &[1.0, 2.0]), None);
    }

    #[test]
    fn test_validate_vector() {
        assert!(validate_vector(&[0.0, 1.0]).is_ok());
        assert!(validate_vector(&[]).is_err());
        assert!(validate_vector(&[f32::NAN]).is_err());
        assert!(validate_vector(&[f32::INFINITY]).is_err());
    }

    #[test]
    fn test_nearest_keeps_insertion_order_for_ties() {
        let ranked = nearest(
            vec![
                neighbor("first", 0.5),
                neighbor("closest", 0.1),
                neighbor("second", 0.5),
                neighbor("far", 2.0),
            ],
            3,
        );
        let ids: Vec<&str> = ranked.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["closest", "first", "second"]);
    }
}
