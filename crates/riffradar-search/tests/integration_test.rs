//! Integration tests for the SQLite-backed index and cache.
//!
//! These run against real database files in a temporary directory.

use std::sync::Arc;

use riffradar_core::encoder::encode;
use riffradar_core::model::{Difficulty, SongRecord};
use riffradar_search::{
    CacheStore, QueryCache, SimilarityIndex, SongIndex, SqliteCacheStore, SqliteVectorStore,
};
use tempfile::TempDir;

fn song(id: &str, chords: &[&str]) -> SongRecord {
    SongRecord::new(
        id,
        id.to_uppercase(),
        "Artist",
        chords.iter().map(|c| c.to_string()).collect(),
        Difficulty::Beginner,
    )
}

/// Index contents survive closing and reopening the database.
#[test]
fn test_index_persists_between_opens() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("songs.db");

    {
        let index = SongIndex::open(SqliteVectorStore::open(&db_path).unwrap()).unwrap();
        index.insert(&song("a", &["C", "G", "Am", "F"])).unwrap();
        index.insert(&song("b", &["G", "D", "Em", "C"])).unwrap();
    }

    let index = SongIndex::open(SqliteVectorStore::open(&db_path).unwrap()).unwrap();
    assert_eq!(index.count().unwrap(), 2);

    let hits = index.query(&encode(&["C", "G", "Am", "F"]), 10).unwrap();
    assert_eq!(hits[0].song_id, "a");
    assert_eq!(hits[0].similarity, 1.0);
}

/// After a reset the index is empty and queries return nothing.
#[test]
fn test_reset_then_query_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let index =
        SongIndex::open(SqliteVectorStore::open(temp_dir.path().join("songs.db")).unwrap())
            .unwrap();
    index.insert(&song("a", &["C"])).unwrap();

    index.reset().unwrap();

    assert_eq!(index.count().unwrap(), 0);
    let hits = index.query(&encode(&["C"]), 5).unwrap();
    assert!(hits.is_empty());
}

/// Cache and index can share one database file.
#[test]
fn test_cache_and_index_share_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("riffradar.db");

    let index = SongIndex::open(SqliteVectorStore::open(&db_path).unwrap()).unwrap();
    let store: Arc<dyn CacheStore> = Arc::new(SqliteCacheStore::open(&db_path).unwrap());
    let cache = QueryCache::new(store);

    index.insert(&song("a", &["D", "A"])).unwrap();
    let hits = index.query(&encode(&["D", "A"]), 3).unwrap();
    cache.put(&["D", "A"], 3, &hits, None);

    assert_eq!(cache.get(&["A", "D"], 3), Some(hits));
    assert!(cache.is_available());
    assert!(index.is_available());
}
