//! Vector search for riffradar.
//!
//! Provides the vector store engines (SQLite and in-memory), the
//! [`SongIndex`] adapter that turns song records into stored vectors and
//! back, and the [`QueryCache`] that memoizes index results per chord set.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod error;
pub mod index;
pub mod schema;
pub mod store;

pub use cache::{CacheStore, MemoryCacheStore, QueryCache, SqliteCacheStore};
pub use error::{Error, Result};
pub use index::{SimilarityIndex, SongIndex, SONGS_COLLECTION};
pub use store::{MemoryVectorStore, SqliteVectorStore, VectorStore};
