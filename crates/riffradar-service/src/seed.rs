//! Catalog seeding.
//!
//! Song files are JSON arrays of
//! `{song_id, song_name, artist, chords, difficulty}` objects. A small
//! catalog ships with the crate as [`DEFAULT_SONGS`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use riffradar_core::model::{Difficulty, SongRecord};

use crate::error::{ServiceError, ServiceResult};
use crate::recommend::Recommender;

/// Bundled starter catalog.
pub const DEFAULT_SONGS: &str = include_str!("../data/songs.json");

/// One entry of a song file.
#[derive(Debug, Clone, Deserialize)]
struct SongEntry {
    song_id: String,
    song_name: String,
    artist: String,
    chords: Vec<String>,
    difficulty: String,
}

impl SongEntry {
    fn into_record(self) -> ServiceResult<SongRecord> {
        let difficulty: Difficulty = self.difficulty.parse().map_err(|e| {
            ServiceError::InvalidData(format!("song {}: {}", self.song_id, e))
        })?;
        Ok(SongRecord::new(
            self.song_id,
            self.song_name,
            self.artist,
            self.chords,
            difficulty,
        ))
    }
}

/// Outcome of a [`seed`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// True when seeding was skipped because the catalog already had songs.
    pub skipped: bool,
    /// Songs in the catalog after the run.
    pub total: usize,
}

/// Parse a JSON song file, keeping file order.
///
/// # Errors
/// Returns an error if the JSON is malformed or an entry has an unknown
/// difficulty.
pub fn parse_songs(json: &str) -> ServiceResult<Vec<SongRecord>> {
    let entries: Vec<SongEntry> = serde_json::from_str(json)?;
    entries.into_iter().map(SongEntry::into_record).collect()
}

/// Read and parse a JSON song file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_songs(path: &Path) -> ServiceResult<Vec<SongRecord>> {
    let json = std::fs::read_to_string(path)?;
    let songs = parse_songs(&json)?;
    log::info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Load `records` into the catalog in order.
///
/// Does nothing if the catalog already has songs and `reset` is false.
/// With `reset`, the catalog is emptied first. A record that fails to
/// insert is logged and counted; the rest of the batch still loads.
///
/// # Errors
/// Returns an error only if the index cannot be counted or reset.
pub fn seed(
    recommender: &Recommender,
    records: Vec<SongRecord>,
    reset: bool,
) -> ServiceResult<SeedSummary> {
    let index = recommender.index();

    let current = index.count()?;
    if current > 0 && !reset {
        log::info!("Database already has {} songs, skipping seed", current);
        return Ok(SeedSummary {
            skipped: true,
            total: current,
            ..SeedSummary::default()
        });
    }

    if reset {
        log::warn!("Resetting song catalog");
        recommender.reset()?;
    }

    if records.is_empty() {
        log::error!("No songs to seed");
    }

    log::info!("Seeding {} songs", records.len());
    let mut summary = SeedSummary::default();
    for record in &records {
        match index.insert(record) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                log::error!("Failed to add {}: {}", record.name, e);
                summary.failed += 1;
            }
        }
    }
    recommender.cache().invalidate_all();

    summary.total = index.count()?;
    log::info!(
        "Seeding complete: {} added, {} failed, {} songs in catalog",
        summary.succeeded,
        summary.failed,
        summary.total
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use riffradar_search::{CacheStore, MemoryCacheStore, MemoryVectorStore, QueryCache, SongIndex};

    fn recommender() -> Recommender {
        Recommender::new(
            Arc::new(SongIndex::open(MemoryVectorStore::new()).unwrap()),
            QueryCache::new(Arc::new(MemoryCacheStore::new()) as Arc<dyn CacheStore>),
        )
    }

    fn record(id: &str, chords: &[&str]) -> SongRecord {
        SongRecord::new(
            id,
            id,
            "Artist",
            chords.iter().map(|c| c.to_string()).collect(),
            Difficulty::Beginner,
        )
    }

    #[test]
    fn test_default_songs_parse() {
        let songs = parse_songs(DEFAULT_SONGS).unwrap();
        assert!(songs.len() >= 20);
        assert_eq!(songs[0].id, "let_it_be");
        assert_eq!(songs[0].chords, vec!["C", "G", "Am", "F"]);
    }

    #[test]
    fn test_parse_rejects_unknown_difficulty() {
        let json = r#"[{"song_id": "x", "song_name": "X", "artist": "A",
                        "chords": ["C"], "difficulty": "legendary"}]"#;
        assert!(matches!(
            parse_songs(json),
            Err(ServiceError::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(parse_songs("[{"), Err(ServiceError::Parse(_))));
    }

    #[test]
    fn test_load_songs_missing_file() {
        let result = load_songs(Path::new("/nonexistent/songs.json"));
        assert!(matches!(result, Err(ServiceError::Io(_))));
    }

    #[test]
    fn test_seed_empty_catalog() {
        let recommender = recommender();
        let summary = seed(
            &recommender,
            vec![record("a", &["C"]), record("b", &["G"])],
            false,
        )
        .unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                succeeded: 2,
                failed: 0,
                skipped: false,
                total: 2,
            }
        );
    }

    #[test]
    fn test_seed_skips_populated_catalog() {
        let recommender = recommender();
        seed(&recommender, vec![record("a", &["C"])], false).unwrap();

        let summary = seed(&recommender, vec![record("b", &["G"])], false).unwrap();

        assert!(summary.skipped);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn test_seed_with_reset_replaces_catalog() {
        let recommender = recommender();
        seed(&recommender, vec![record("a", &["C"])], false).unwrap();

        let summary = seed(
            &recommender,
            vec![record("b", &["G"]), record("c", &["D"])],
            true,
        )
        .unwrap();

        assert!(!summary.skipped);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_seed_counts_failures_without_aborting() {
        let recommender = recommender();
        let records = vec![
            record("a", &["C"]),
            record("a", &["G"]),
            record("b", &["D"]),
        ];

        let summary = seed(&recommender, records, false).unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total, 2);
    }
}
