//! Core domain model for riffradar.
//!
//! This crate defines the chord parser, the progression encoder that turns
//! an ordered chord sequence into a fixed-length vector, and the song and
//! match types shared by the search and service layers. Everything here is
//! pure: no I/O, no shared state.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod chord;
pub mod encoder;
pub mod error;
pub mod model;

pub use chord::{parse, ParsedChord, PitchClass, Quality};
pub use encoder::{encode, encode_detailed, Encoding, ProgressionVector, DIMENSIONS, MAX_CHORDS};
pub use error::{Error, Result};
