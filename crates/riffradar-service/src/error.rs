//! Error types for the recommendation service.

use thiserror::Error;

/// Errors from a tutorial lookup.
///
/// None of these ever fail a recommendation request; they are logged and
/// the affected recommendation is returned without a tutorial.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// An HTTP request to an external source failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The external source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// The source refused the request outright (bad key, quota, bad query).
    #[error("{source_name} rejected the request with status {status}")]
    Rejected { source_name: String, status: u16 },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The lookup did not finish inside its time budget.
    #[error("{source_name} lookup timed out after {seconds}s")]
    Timeout { source_name: String, seconds: f64 },
}

impl EnrichError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;

/// Errors surfaced to callers of the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The similarity index could not answer. Distinct from "no matches".
    #[error("similarity index unavailable: {0}")]
    Index(#[from] riffradar_search::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse song data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The index refused a song; it is still reachable.
    #[error("song rejected: {0}")]
    Rejected(#[source] riffradar_search::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ServiceError {
    /// Classify an index error raised while adding a song.
    pub fn from_insert(error: riffradar_search::Error) -> Self {
        match error {
            riffradar_search::Error::DuplicateId { .. }
            | riffradar_search::Error::InvalidVector(_) => Self::Rejected(error),
            other => Self::Index(other),
        }
    }
}

/// Convenience alias for service results.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
