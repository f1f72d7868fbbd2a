//! Progression encoding.
//!
//! An ordered chord sequence is written into a fixed-length vector, two
//! slots per chord: `[root / 11, quality]`. Only the first [`MAX_CHORDS`]
//! chords count. Unrecognized chords and unused positions stay at `0.0`,
//! which is indistinguishable from a C major chord in the same slot;
//! [`Encoding::recognized`] reports how many chords actually contributed.

use serde::{Deserialize, Serialize};

use crate::chord;

/// Number of chords that influence the encoding.
pub const MAX_CHORDS: usize = 8;

/// Length of a [`ProgressionVector`].
pub const DIMENSIONS: usize = MAX_CHORDS * 2;

/// Fixed-length numeric encoding of a chord progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionVector([f32; DIMENSIONS]);

impl ProgressionVector {
    #[must_use]
    pub const fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl Default for ProgressionVector {
    fn default() -> Self {
        Self([0.0; DIMENSIONS])
    }
}

impl AsRef<[f32]> for ProgressionVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// A vector together with the number of chords that were recognized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoding {
    pub vector: ProgressionVector,
    pub recognized: usize,
}

/// Encode a chord progression.
pub fn encode<S: AsRef<str>>(chords: &[S]) -> ProgressionVector {
    encode_detailed(chords).vector
}

/// Encode a chord progression and count the chords that contributed.
pub fn encode_detailed<S: AsRef<str>>(chords: &[S]) -> Encoding {
    let mut values = [0.0_f32; DIMENSIONS];
    let mut recognized = 0;

    for (i, symbol) in chords.iter().take(MAX_CHORDS).enumerate() {
        if let Some(parsed) = chord::parse(symbol.as_ref()) {
            values[2 * i] = parsed.root.normalized();
            values[2 * i + 1] = parsed.quality.value();
            recognized += 1;
        }
    }

    Encoding {
        vector: ProgressionVector(values),
        recognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pop_progression() {
        let vector = encode(&["C", "G", "Am", "F"]);
        let v = vector.as_slice();
        assert_eq!(v.len(), DIMENSIONS);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 1.0 / 11.0);
        assert_eq!(v[3], 0.0);
        assert_eq!(v[4], 3.0 / 11.0);
        assert_eq!(v[5], 0.5);
        assert_eq!(v[6], 1.0);
        assert_eq!(v[7], 0.0);
        assert!(v[8..].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let chords = ["Em", "C", "G", "D7", "Asus4"];
        let a = encode(&chords);
        let b = encode(&chords);
        assert_eq!(a, b);
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_encode_truncates_after_max_chords() {
        let eight = ["C", "G", "Am", "F", "C", "G", "F", "C"];
        let mut longer = eight.to_vec();
        longer.extend(["Bb7", "F#m", "Xyz", "Dsus2"]);

        assert_eq!(encode(&eight), encode(&longer));
    }

    #[test]
    fn test_encode_enharmonic_equivalence() {
        assert_eq!(encode(&["F#"]), encode(&["Gb"]));
        assert_eq!(encode(&["C#m", "Ab7"]), encode(&["Dbm", "G#7"]));
    }

    #[test]
    fn test_encode_unrecognized_leaves_zero_slot() {
        let encoding = encode_detailed(&["G", "Xyz", "D"]);
        let v = encoding.vector.as_slice();
        assert_eq!(v[2], 0.0);
        assert_eq!(v[3], 0.0);
        assert_eq!(v[4], 2.0 / 11.0);
        assert_eq!(encoding.recognized, 2);
    }

    #[test]
    fn test_encode_unrecognized_matches_c_major() {
        // Known ambiguity: only the recognized count tells them apart.
        let unknown = encode_detailed(&["Xyz"]);
        let c_major = encode_detailed(&["C"]);
        assert_eq!(unknown.vector, c_major.vector);
        assert_eq!(unknown.recognized, 0);
        assert_eq!(c_major.recognized, 1);
    }

    #[test]
    fn test_encode_empty() {
        let encoding = encode_detailed::<&str>(&[]);
        assert_eq!(encoding.vector, ProgressionVector::default());
        assert_eq!(encoding.recognized, 0);
    }

    #[test]
    fn test_encode_accepts_owned_strings() {
        let owned = vec!["Am".to_string(), "E7".to_string()];
        assert_eq!(encode(&owned), encode(&["Am", "E7"]));
    }

    #[test]
    fn test_order_matters() {
        assert_ne!(encode(&["C", "G"]), encode(&["G", "C"]));
    }
}
