//! Result types returned by a discovery run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::post::RawPost;
use crate::types::sentiment::{ComponentSentiment, SentimentSummary};
use crate::types::topic::Topic;

/// One ranked topic with its sentiment aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingTopic {
    /// The scored, frozen topic
    pub topic: Topic,

    /// Sentiment tally over the re-fetched post sample. All-zero when
    /// sentiment analysis was disabled or the re-fetch found nothing.
    pub sentiment: SentimentSummary,

    /// Representative posts (top-scored per sentiment bucket)
    pub sample_posts: Vec<RawPost>,

    /// Component-level sentiment breakdown. `None` when enrichment was not
    /// requested, not available, or failed for this topic.
    pub component_analysis: Option<Vec<ComponentSentiment>>,
}

/// A complete discovery result: ranked topics plus batch metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingReport {
    /// Identifier for this analysis batch
    pub batch_id: Uuid,

    /// Ranked topics, ordered by rank ascending
    pub topics: Vec<TrendingTopic>,

    /// Topic count before truncation to `top_n`
    pub total_topics_found: usize,

    /// Wall-clock time the analysis took, in milliseconds
    pub analysis_time_ms: u64,

    /// The effective time window that was analyzed
    pub time_window_hours: u32,

    /// The category filter that was applied
    pub category: String,

    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

impl TrendingReport {
    /// The top-ranked topic, if any were found.
    pub fn top(&self) -> Option<&TrendingTopic> {
        self.topics.first()
    }
}
