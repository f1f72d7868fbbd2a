//! Tutorial enrichment for recommendations.
//!
//! A [`TutorialProvider`] turns a free-text query into at most one video
//! tutorial. Lookups are best-effort: callers bound them with a deadline and
//! treat every error as "no tutorial".

use std::fmt;

use riffradar_core::model::Tutorial;

use crate::error::EnrichResult;

pub mod resilience;
pub mod youtube;

/// A source of video tutorials.
#[async_trait::async_trait]
pub trait TutorialProvider: Send + Sync + fmt::Debug {
    /// Human-readable source name used in logs.
    fn name(&self) -> &str;

    /// Best tutorial for `query`, or `None` when the source has nothing.
    async fn search(&self, query: &str) -> EnrichResult<Option<Tutorial>>;
}
