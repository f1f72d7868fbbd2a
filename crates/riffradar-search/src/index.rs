//! Similarity index over song progressions.
//!
//! [`SongIndex`] adapts any [`VectorStore`] to the song domain: records go
//! in as `(id, progression vector, flat metadata)` and come back out as
//! [`ScoredMatch`]es with `similarity = 1 - squared_l2`. Similarity is not
//! clamped and can be negative for very different progressions.

use std::fmt;
use std::sync::{RwLock, RwLockReadGuard};

use riffradar_core::encoder::ProgressionVector;
use riffradar_core::model::{Difficulty, ScoredMatch, SongRecord};

use crate::error::{Error, Result};
use crate::store::{CollectionHandle, Metadata, Neighbor, VectorStore};

/// Default collection holding the song catalog.
pub const SONGS_COLLECTION: &str = "songs";

const KEY_SONG_NAME: &str = "song_name";
const KEY_ARTIST: &str = "artist";
const KEY_CHORDS: &str = "chords";
const KEY_DIFFICULTY: &str = "difficulty";
const CHORD_DELIMITER: &str = ",";

/// Nearest-neighbor index of songs.
///
/// Each call is atomic from the caller's point of view. [`reset`] is
/// exclusive: a concurrent query sees the catalog either before or after
/// the reset, never in between.
///
/// [`reset`]: SimilarityIndex::reset
pub trait SimilarityIndex: Send + Sync + fmt::Debug {
    /// Add a record. Re-adding an identical record is a no-op; reusing an
    /// id with different data is an error.
    fn insert(&self, record: &SongRecord) -> Result<()>;

    /// Up to `k` most similar songs, best first. Equal distances keep
    /// insertion order.
    fn query(&self, vector: &ProgressionVector, k: usize) -> Result<Vec<ScoredMatch>>;

    /// Number of indexed songs.
    fn count(&self) -> Result<usize>;

    /// Remove every song. When this returns, `count()` is zero.
    fn reset(&self) -> Result<()>;

    /// Whether the underlying store answers at all.
    fn is_available(&self) -> bool {
        self.count().is_ok()
    }
}

/// [`SimilarityIndex`] backed by a named collection in a [`VectorStore`].
#[derive(Debug)]
pub struct SongIndex<S> {
    store: S,
    collection: RwLock<CollectionHandle>,
}

impl<S: VectorStore> SongIndex<S> {
    /// Open the `songs` collection in `store`, creating it if needed.
    pub fn open(store: S) -> Result<Self> {
        Self::open_collection(store, SONGS_COLLECTION)
    }

    /// Open a specific collection in `store`, creating it if needed.
    pub fn open_collection(store: S, name: &str) -> Result<Self> {
        let handle = store.create_or_get_collection(name)?;
        Ok(Self {
            store,
            collection: RwLock::new(handle),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CollectionHandle>> {
        self.collection
            .read()
            .map_err(|_| Error::Unavailable("song index lock poisoned".to_string()))
    }
}

impl<S: VectorStore> SimilarityIndex for SongIndex<S> {
    fn insert(&self, record: &SongRecord) -> Result<()> {
        let collection = self.read()?;
        self.store.insert(
            &collection,
            &record.id,
            record.vector.as_slice(),
            &to_metadata(record),
        )
    }

    fn query(&self, vector: &ProgressionVector, k: usize) -> Result<Vec<ScoredMatch>> {
        let collection = self.read()?;
        self.store
            .query(&collection, vector.as_slice(), k)?
            .into_iter()
            .map(from_neighbor)
            .collect()
    }

    fn count(&self) -> Result<usize> {
        let collection = self.read()?;
        self.store.count(&collection)
    }

    fn reset(&self) -> Result<()> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| Error::Unavailable("song index lock poisoned".to_string()))?;

        self.store.delete_collection(&collection.name)?;
        *collection = self.store.create_or_get_collection(&collection.name)?;
        log::info!("Reset collection {}", collection.name);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.store.ping()
    }
}

fn to_metadata(record: &SongRecord) -> Metadata {
    Metadata::from([
        (KEY_SONG_NAME.to_string(), record.name.clone()),
        (KEY_ARTIST.to_string(), record.artist.clone()),
        (
            KEY_CHORDS.to_string(),
            record.chords.join(CHORD_DELIMITER),
        ),
        (
            KEY_DIFFICULTY.to_string(),
            record.difficulty.as_str().to_string(),
        ),
    ])
}

fn from_neighbor(neighbor: Neighbor) -> Result<ScoredMatch> {
    let field = |key: &str| {
        neighbor.metadata.get(key).cloned().ok_or_else(|| {
            Error::InvalidData(format!("song {} is missing metadata {key}", neighbor.id))
        })
    };

    let chords = field(KEY_CHORDS)?;
    let difficulty: Difficulty = field(KEY_DIFFICULTY)?.parse()?;

    Ok(ScoredMatch {
        song_name: field(KEY_SONG_NAME)?,
        artist: field(KEY_ARTIST)?,
        chords: if chords.is_empty() {
            Vec::new()
        } else {
            chords.split(CHORD_DELIMITER).map(str::to_string).collect()
        },
        difficulty,
        similarity: 1.0 - neighbor.distance,
        song_id: neighbor.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryVectorStore;
    use riffradar_core::encoder::encode;

    fn song(id: &str, name: &str, chords: &[&str]) -> SongRecord {
        SongRecord::new(
            id,
            name,
            "Test Artist",
            chords.iter().map(|c| c.to_string()).collect(),
            Difficulty::Beginner,
        )
    }

    fn index() -> SongIndex<MemoryVectorStore> {
        SongIndex::open(MemoryVectorStore::new()).unwrap()
    }

    #[test]
    fn test_identical_progression_scores_one() {
        let index = index();
        index.insert(&song("let-it-be", "Let It Be", &["C", "G", "Am", "F"])).unwrap();
        index.insert(&song("knockin", "Knockin'", &["G", "D", "Am"])).unwrap();
        index.insert(&song("horse", "Horse With No Name", &["Em", "D6/9"])).unwrap();

        let hits = index.query(&encode(&["C", "G", "Am", "F"]), 5).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].song_id, "let-it-be");
        assert_eq!(hits[0].similarity, 1.0);
        assert!(hits[1].similarity <= hits[0].similarity);
        assert!(hits[2].similarity <= hits[1].similarity);
    }

    #[test]
    fn test_similarity_is_not_clamped() {
        let index = index();
        index
            .insert(&song("far", "Far", &["F7", "F7", "F7", "F7", "F7", "F7", "F7", "F7"]))
            .unwrap();

        let hits = index.query(&encode(&["C", "C", "C", "C"]), 1).unwrap();
        assert!(hits[0].similarity < 0.0);
    }

    #[test]
    fn test_metadata_round_trip() {
        let index = index();
        let record = SongRecord::new(
            "wonderwall",
            "Wonderwall",
            "Oasis",
            vec!["Em7".into(), "G".into(), "Dsus4".into(), "A7sus4".into()],
            Difficulty::Intermediate,
        );
        index.insert(&record).unwrap();

        let hit = index.query(&record.vector, 1).unwrap().remove(0);
        assert_eq!(hit, ScoredMatch::from_record(&record, 1.0));
    }

    #[test]
    fn test_reset_empties_index() {
        let index = index();
        index.insert(&song("a", "A", &["C"])).unwrap();
        index.insert(&song("b", "B", &["G"])).unwrap();
        assert_eq!(index.count().unwrap(), 2);

        index.reset().unwrap();

        assert_eq!(index.count().unwrap(), 0);
        assert!(index.query(&encode(&["C"]), 10).unwrap().is_empty());

        index.insert(&song("a", "A", &["D"])).unwrap();
        assert_eq!(index.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_duplicate_id_with_different_data_fails() {
        let index = index();
        index.insert(&song("a", "A", &["C"])).unwrap();
        index.insert(&song("a", "A", &["C"])).unwrap();
        assert!(index.insert(&song("a", "A", &["G"])).is_err());
        assert_eq!(index.count().unwrap(), 1);
    }

    #[test]
    fn test_from_neighbor_missing_metadata() {
        let neighbor = Neighbor {
            id: "x".to_string(),
            distance: 0.0,
            metadata: Metadata::new(),
        };
        let err = from_neighbor(neighbor).unwrap_err();
        assert!(err.to_string().contains("missing metadata"));
    }

    const CATALOG_SIZE: usize = 20;

    /// Readers racing a reset see the whole catalog or none of it.
    fn assert_query_during_reset_is_atomic<S: VectorStore>(index: &SongIndex<S>) {
        for i in 0..CATALOG_SIZE {
            let id = format!("song-{i}");
            let chords: &[&str] = if i % 2 == 0 { &["C", "G", "Am", "F"] } else { &["Em", "D"] };
            index.insert(&song(&id, &id, chords)).unwrap();
        }
        let query = &encode(&["C", "G", "Am", "F"]);

        std::thread::scope(|scope| {
            let readers: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(move || {
                        for _ in 0..200 {
                            let hits = index.query(query, 50).unwrap();
                            assert!(
                                hits.is_empty() || hits.len() == CATALOG_SIZE,
                                "partial catalog: {} songs",
                                hits.len()
                            );
                            let count = index.count().unwrap();
                            assert!(count == 0 || count == CATALOG_SIZE);
                        }
                    })
                })
                .collect();

            scope.spawn(|| index.reset().unwrap());

            for reader in readers {
                reader.join().unwrap();
            }
        });

        assert_eq!(index.count().unwrap(), 0);
        assert!(index.query(query, 50).unwrap().is_empty());
    }

    #[test]
    fn test_query_during_reset_memory_store() {
        assert_query_during_reset_is_atomic(&index());
    }

    #[test]
    fn test_query_during_reset_sqlite_store() {
        let store = crate::store::SqliteVectorStore::open_in_memory().unwrap();
        assert_query_during_reset_is_atomic(&SongIndex::open(store).unwrap());
    }

    #[test]
    fn test_empty_chords_metadata() {
        let index = index();
        index.insert(&song("silent", "Silence", &[])).unwrap();
        let hit = index.query(&ProgressionVector::default(), 1).unwrap().remove(0);
        assert!(hit.chords.is_empty());
    }
}
