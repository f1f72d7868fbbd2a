use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] riffradar_core::Error),

    #[error("duplicate id {id} in collection {collection} with different data")]
    DuplicateId { collection: String, id: String },

    #[error("invalid vector: {0}")]
    InvalidVector(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
