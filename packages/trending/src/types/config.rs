//! Request and engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendingError};

/// Parameters of a single discovery request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRequest {
    /// Category (subreddit) to analyze
    pub category: String,

    /// How far back to look, in hours
    pub time_window_hours: u32,

    /// Maximum number of topics to return
    pub top_n: usize,

    /// Minimum distinct posts a topic needs to be kept
    pub min_posts: usize,

    /// Run the per-topic sentiment aggregation stage
    pub analyze_sentiment: bool,

    /// Delegate the sentiment sample to the component enricher.
    /// Requires `analyze_sentiment`; without it there is no sample to
    /// delegate and components stay `None`.
    pub analyze_components: bool,
}

impl DiscoveryRequest {
    /// Create a request for a category with default parameters
    /// (24h window, top 10 topics, 2-post floor, sentiment on,
    /// components off).
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            time_window_hours: 24,
            top_n: 10,
            min_posts: 2,
            analyze_sentiment: true,
            analyze_components: false,
        }
    }

    /// Set the time window in hours.
    pub fn with_window_hours(mut self, hours: u32) -> Self {
        self.time_window_hours = hours;
        self
    }

    /// Set the maximum number of topics to return.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the minimum distinct-post floor.
    pub fn with_min_posts(mut self, min_posts: usize) -> Self {
        self.min_posts = min_posts;
        self
    }

    /// Enable or disable sentiment aggregation.
    pub fn with_sentiment(mut self, enabled: bool) -> Self {
        self.analyze_sentiment = enabled;
        self
    }

    /// Enable or disable component enrichment.
    pub fn with_components(mut self, enabled: bool) -> Self {
        self.analyze_components = enabled;
        self
    }

    /// Validate against engine limits. Called by the engine before the
    /// pipeline starts; malformed requests never reach ingestion.
    pub fn validate(&self, config: &EngineConfig) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(TrendingError::InvalidRequest {
                reason: "category must not be empty".to_string(),
            });
        }
        if !self
            .category
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(TrendingError::InvalidRequest {
                reason: format!("category '{}' contains invalid characters", self.category),
            });
        }
        if self.time_window_hours == 0 || self.time_window_hours > config.max_window_hours {
            return Err(TrendingError::InvalidRequest {
                reason: format!(
                    "time_window_hours must be in 1..={}, got {}",
                    config.max_window_hours, self.time_window_hours
                ),
            });
        }
        if self.top_n == 0 || self.top_n > config.max_top_n {
            return Err(TrendingError::InvalidRequest {
                reason: format!(
                    "top_n must be in 1..={}, got {}",
                    config.max_top_n, self.top_n
                ),
            });
        }
        if self.min_posts == 0 {
            return Err(TrendingError::InvalidRequest {
                reason: "min_posts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Weights of the trending score blend.
///
/// The defaults are empirical tuning, not derived law — treat them as
/// configuration requiring calibration against real data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of the distinct post count
    pub posts: f64,

    /// Weight of the summed upvote score
    pub score: f64,

    /// Weight of the summed comment count
    pub comments: f64,

    /// Weight of the average per-post velocity
    pub velocity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            posts: 10.0,
            score: 0.1,
            comments: 0.2,
            velocity: 2.0,
        }
    }
}

/// Engine-level tuning knobs, fixed across requests.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Trending score weights
    pub weights: ScoringWeights,

    /// Jaccard token-overlap threshold above which two phrases merge
    /// (containment merges regardless). Empirical; see [`ScoringWeights`].
    pub merge_overlap_threshold: f64,

    /// Worker pool size for per-topic sentiment aggregation
    pub sentiment_concurrency: usize,

    /// Per-call budget for the component enricher. On expiry only that
    /// topic's `component_analysis` degrades to `None`.
    pub enricher_timeout: Duration,

    /// Wall-clock budget for a whole discovery request
    pub request_timeout: Duration,

    /// Representative posts kept per topic
    pub sample_size: usize,

    /// Upper bound accepted for `time_window_hours`
    pub max_window_hours: u32,

    /// Upper bound accepted for `top_n`
    pub max_top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            merge_overlap_threshold: 0.6,
            sentiment_concurrency: 5,
            enricher_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            sample_size: 3,
            max_window_hours: 168,
            max_top_n: 50,
        }
    }
}

impl EngineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the alias-merge overlap threshold.
    pub fn with_merge_overlap_threshold(mut self, threshold: f64) -> Self {
        self.merge_overlap_threshold = threshold;
        self
    }

    /// Set the aggregation worker pool size.
    pub fn with_sentiment_concurrency(mut self, concurrency: usize) -> Self {
        self.sentiment_concurrency = concurrency.max(1);
        self
    }

    /// Set the per-call enricher budget.
    pub fn with_enricher_timeout(mut self, timeout: Duration) -> Self {
        self.enricher_timeout = timeout;
        self
    }

    /// Set the whole-request budget.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the per-topic sample size.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}
