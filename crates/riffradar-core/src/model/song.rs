use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoder::{encode, ProgressionVector};
use crate::error::Error;

/// How hard a song is to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(Error::InvalidData(format!("unknown difficulty: {other}"))),
        }
    }
}

/// A song in the catalog.
///
/// Records are created at seed time and never updated; the vector is always
/// derived from `chords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub chords: Vec<String>,
    pub difficulty: Difficulty,
    pub vector: ProgressionVector,
}

impl SongRecord {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        chords: Vec<String>,
        difficulty: Difficulty,
    ) -> Self {
        let vector = encode(&chords);
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            chords,
            difficulty,
            vector,
        }
    }
}
