//! Chord symbol parsing.
//!
//! A chord symbol such as `"Am"`, `"G7"` or `"Csus4"` is reduced to two
//! coarse features: the root's position on the circle of fifths and a
//! quality class. Quality rules are checked in a fixed order and the first
//! match wins:
//!
//! 1. contains `m`/`M` and no `7` -> [`Quality::Minor`], root has every
//!    `m`/`M` removed
//! 2. contains `7` -> [`Quality::Seventh`], root has every `7`/`m`/`M` removed
//! 3. contains `sus` (any case) -> [`Quality::Suspended`], root is the text
//!    before `sus`
//! 4. otherwise [`Quality::Major`], root is the whole symbol
//!
//! The root must then be one of the 17 spellings in the enharmonic table or
//! the chord is unrecognized.

use std::fmt;

use serde::{Deserialize, Serialize};


/// Root spellings and their position on the circle of fifths.
///
/// Enharmonic spellings share a position (`F#`/`Gb`, `C#`/`Db`, ...).
const CIRCLE_OF_FIFTHS: &[(&str, u8)] = &[
    ("C", 0),
    ("G", 1),
    ("D", 2),
    ("A", 3),
    ("E", 4),
    ("B", 5),
    ("F#", 6),
    ("Gb", 6),
    ("C#", 7),
    ("Db", 7),
    ("G#", 8),
    ("Ab", 8),
    ("D#", 9),
    ("Eb", 9),
    ("A#", 10),
    ("Bb", 10),
    ("F", 11),
];

/// Highest pitch class index, used to normalize into `0.0..=1.0`.
const MAX_PITCH_CLASS: f32 = 11.0;

/// A chord root collapsed to one of 12 circle-of-fifths positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Look up a root spelling in the enharmonic table (case-sensitive).
    pub fn from_root(root: &str) -> Option<Self> {
        CIRCLE_OF_FIFTHS
            .iter()
            .find(|(spelling, _)| *spelling == root)
            .map(|&(_, index)| Self(index))
    }

    /// Position on the circle of fifths, `0..=11`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Position scaled into `0.0..=1.0`.
    #[must_use]
    pub fn normalized(self) -> f32 {
        f32::from(self.0) / MAX_PITCH_CLASS
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First spelling wins, so sharps are preferred over flats.
        let spelling = CIRCLE_OF_FIFTHS
            .iter()
            .find(|&&(_, index)| index == self.0)
            .map_or("?", |&(spelling, _)| spelling);
        write!(f, "{spelling}")
    }
}

/// Coarse chord type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Major,
    Minor,
    Seventh,
    Suspended,
}

impl Quality {
    /// Numeric code written into the progression vector.
    #[must_use]
    pub const fn value(self) -> f32 {
        match self {
            Self::Major => 0.0,
            Self::Suspended => 0.25,
            Self::Minor => 0.5,
            Self::Seventh => 0.75,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Seventh => "seventh",
            Self::Suspended => "suspended",
        };
        write!(f, "{name}")
    }
}

/// A recognized chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedChord {
    pub root: PitchClass,
    pub quality: Quality,
}

/// Parse a chord symbol, returning `None` when its root is not in the
/// enharmonic table.
pub fn parse(symbol: &str) -> Option<ParsedChord> {
    let (root, quality) = split_quality(symbol.trim());
    PitchClass::from_root(&root).map(|root| ParsedChord { root, quality })
}

fn split_quality(symbol: &str) -> (String, Quality) {
    let is_m = |c: char| matches!(c, 'm' | 'M');

    if symbol.contains(is_m) && !symbol.contains('7') {
        let root = symbol.chars().filter(|&c| !is_m(c)).collect();
        return (root, Quality::Minor);
    }

    if symbol.contains('7') {
        let root = symbol
            .chars()
            .filter(|&c| c != '7' && !is_m(c))
            .collect();
        return (root, Quality::Seventh);
    }

    if symbol.to_ascii_lowercase().contains("sus") {
        // The split itself is case-sensitive, so "CSUS4" keeps its full text
        // as the root and ends up unrecognized.
        let root = symbol.find("sus").map_or(symbol, |at| &symbol[..at]);
        return (root.to_string(), Quality::Suspended);
    }

    (symbol.to_string(), Quality::Major)
}

impl fmt::Display for ParsedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.quality)
    }
}
