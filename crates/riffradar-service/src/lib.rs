//! Recommendation service for riffradar.
//!
//! Wires the encoder, similarity index, and query cache together into the
//! [`Recommender`], attaches video tutorials through a
//! [`TutorialProvider`], and loads the song catalog via [`seed`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod enrich;
pub mod error;
pub mod recommend;
pub mod seed;

pub use config::Config;
pub use enrich::youtube::YouTubeClient;
pub use enrich::TutorialProvider;
pub use error::{EnrichError, EnrichResult, ServiceError, ServiceResult};
pub use recommend::{Health, Recommender, Stats, SIMILARITY_THRESHOLD};
pub use seed::{seed, SeedSummary};
