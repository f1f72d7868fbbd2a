use serde::{Deserialize, Serialize};

use crate::model::scored::ScoredMatch;
use crate::model::song::Difficulty;

/// A video tutorial attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub thumbnail: String,
}

/// A song returned to the caller, ranked by similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub song_id: String,
    pub song_name: String,
    pub artist: String,
    pub chords: Vec<String>,
    pub difficulty: Difficulty,

    /// Similarity rounded to three decimals.
    pub similarity_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial: Option<Tutorial>,
}

impl Recommendation {
    /// Build a recommendation from a match and its already-rounded score.
    #[must_use]
    pub fn from_match(hit: ScoredMatch, similarity_score: f64) -> Self {
        Self {
            song_id: hit.song_id,
            song_name: hit.song_name,
            artist: hit.artist,
            chords: hit.chords,
            difficulty: hit.difficulty,
            similarity_score,
            tutorial: None,
        }
    }

    #[must_use]
    pub fn with_tutorial(mut self, tutorial: Option<Tutorial>) -> Self {
        self.tutorial = tutorial;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit() -> ScoredMatch {
        ScoredMatch {
            song_id: "wonderwall".to_string(),
            song_name: "Wonderwall".to_string(),
            artist: "Oasis".to_string(),
            chords: vec!["Em7".to_string(), "G".to_string()],
            difficulty: Difficulty::Beginner,
            similarity: 0.912_345,
        }
    }

    #[test]
    fn test_from_match_uses_given_score() {
        let rec = Recommendation::from_match(hit(), 0.912);
        assert_eq!(rec.similarity_score, 0.912);
        assert_eq!(rec.song_name, "Wonderwall");
        assert!(rec.tutorial.is_none());
    }

    #[test]
    fn test_tutorial_omitted_from_json_when_absent() {
        let rec = Recommendation::from_match(hit(), 0.912);
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("tutorial").is_none());
        assert_eq!(json["difficulty"], "beginner");

        let rec = rec.with_tutorial(Some(Tutorial {
            video_id: "abc".to_string(),
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            title: "Wonderwall lesson".to_string(),
            thumbnail: "https://i.ytimg.com/vi/abc/hqdefault.jpg".to_string(),
        }));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["tutorial"]["video_id"], "abc");
    }
}
