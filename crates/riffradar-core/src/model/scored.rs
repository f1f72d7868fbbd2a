use serde::{Deserialize, Serialize};

use crate::model::song::{Difficulty, SongRecord};

/// A nearest-neighbor hit from the similarity index.
///
/// `similarity` is `1 - distance` and is not clamped: values below zero are
/// legal and left for consumers to handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub song_id: String,
    pub song_name: String,
    pub artist: String,
    pub chords: Vec<String>,
    pub difficulty: Difficulty,
    pub similarity: f64,
}

impl ScoredMatch {
    #[must_use]
    pub fn from_record(record: &SongRecord, similarity: f64) -> Self {
        Self {
            song_id: record.id.clone(),
            song_name: record.name.clone(),
            artist: record.artist.clone(),
            chords: record.chords.clone(),
            difficulty: record.difficulty,
            similarity,
        }
    }
}
