//! Post source trait for pluggable content ingestion.
//!
//! The engine never talks to a network itself; it consumes posts through
//! this seam. Implementations fetch from forums, APIs, fixtures, or mocks.

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::types::post::RawPost;

/// Supplies raw posts for a time window.
///
/// Two entry points: `fetch_posts` feeds the initial extraction batch,
/// `fetch_posts_matching` re-fetches posts mentioning a topic (or any of its
/// aliases) for sentiment aggregation.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch recent posts for a category within the window.
    ///
    /// Returning an empty vector is valid — the engine maps it to
    /// `TrendingError::NoData`, not the source.
    async fn fetch_posts(&self, category: &str, time_window_hours: u32)
        -> SourceResult<Vec<RawPost>>;

    /// Fetch posts matching any of the given terms within the window.
    ///
    /// `terms` is a topic's canonical name followed by its aliases. An empty
    /// result is valid and yields an all-zero sentiment summary downstream.
    async fn fetch_posts_matching(
        &self,
        terms: &[String],
        time_window_hours: u32,
    ) -> SourceResult<Vec<RawPost>>;

    /// Source name for logging/debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}
