//! SQLite schema shared by the vector store and the cache store.

pub mod db;
pub mod migrations;

pub use db::Database;
