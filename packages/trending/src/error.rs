//! Typed errors for the trending engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Capability seams (post source,
//! classifier, enricher) get their own error enums so implementations stay
//! decoupled from the request-level taxonomy.

use thiserror::Error;

/// Errors that can fail an entire discovery request.
#[derive(Debug, Error)]
pub enum TrendingError {
    /// Request rejected before the pipeline started
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Ingestion returned zero posts for the window/category
    #[error("no posts found in category '{category}' within the last {time_window_hours}h")]
    NoData {
        category: String,
        time_window_hours: u32,
    },

    /// Extraction and normalization produced zero topics meeting the floor.
    /// Distinct from [`TrendingError::NoData`]: posts existed, topics did not.
    #[error("no topics with at least {min_posts} posts found in category '{category}'")]
    NoTopics { category: String, min_posts: usize },

    /// Post source failed (fatal — ingestion is a core capability)
    #[error("post source failed: {0}")]
    Source(#[from] SourceError),

    /// Sentiment classifier failed at the capability level
    #[error("sentiment classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    /// The request exceeded its wall-clock budget
    #[error("{stage} exceeded the request time budget")]
    Timeout { stage: &'static str },
}

/// Errors that can occur while fetching posts.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Upstream replied but the payload did not parse
    #[error("unexpected response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },

    /// Upstream rate limit hit
    #[error("rate limited by upstream")]
    RateLimited,

    /// Upstream did not answer in time
    #[error("timed out fetching posts")]
    Timeout,
}

/// Errors that can occur while classifying sentiment.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Classifier could not be reached or constructed
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// Classification of a specific text failed
    #[error("classification failed: {0}")]
    Failed(String),
}

/// Errors that can occur during component enrichment.
///
/// These never surface at the request level: the aggregator catches them per
/// topic and degrades `component_analysis` to `None`.
#[derive(Debug, Error)]
pub enum EnricherError {
    /// Enrichment call failed
    #[error("enrichment failed: {0}")]
    Failed(String),

    /// Enricher replied but the payload did not parse
    #[error("invalid enrichment response: {0}")]
    InvalidResponse(String),

    /// Enrichment call exceeded its per-call budget
    #[error("enrichment timed out after {0}s")]
    Timeout(u64),
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, TrendingError>;

/// Result type alias for post source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for classifier operations.
pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

/// Result type alias for enricher operations.
pub type EnricherResult<T> = std::result::Result<T, EnricherError>;
