//! Trending scoring - velocity, score blend, normalization, rank.
//!
//! The scoring formula combines:
//! - distinct post count (frequency)
//! - total upvote score and comment count (raw popularity)
//! - average per-post velocity (momentum)
//!
//! `trending_strength` rescales the blend to 0-100 against the batch
//! maximum, so the top scorer of any batch lands on exactly 100 when scores
//! are distinct and positive.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::config::ScoringWeights;
use crate::types::post::RawPost;
use crate::types::topic::{NormalizedTopic, Topic};

/// Posts younger than this many hours are treated as this old, so a
/// minutes-old post cannot blow up its velocity.
pub const MIN_AGE_HOURS: f64 = 0.5;

/// Comment weight inside the velocity numerator: a comment signals more
/// engagement than an upvote.
const VELOCITY_COMMENT_WEIGHT: f64 = 2.0;

/// Scores, normalizes, and ranks normalized topics.
///
/// # Example
/// ```rust,ignore
/// let scorer = TrendingScorer::new(ScoringWeights::default());
/// let ranked = scorer.score_topics(clusters, Utc::now());
/// assert_eq!(ranked[0].rank, 1);
/// ```
pub struct TrendingScorer {
    weights: ScoringWeights,
}

impl TrendingScorer {
    /// Create a scorer with the given weights.
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Engagement rate of one post: `(score + 2*comments) / age_hours`,
    /// with the age floored at [`MIN_AGE_HOURS`].
    pub fn post_velocity(&self, post: &RawPost, now: DateTime<Utc>) -> f64 {
        let engagement = post.score as f64 + VELOCITY_COMMENT_WEIGHT * post.num_comments as f64;
        engagement / post.age_hours(now).max(MIN_AGE_HOURS)
    }

    /// Blend counters and velocity into the topic score.
    fn blend(&self, topic: &Topic) -> f64 {
        self.weights.posts * topic.post_count as f64
            + self.weights.score * topic.total_score as f64
            + self.weights.comments * topic.total_comments as f64
            + self.weights.velocity * topic.avg_velocity
    }

    /// Score, normalize, and rank a batch of topics.
    ///
    /// Returns the frozen topics sorted by rank (1-based, gap-free).
    /// Ordering is deterministic: descending `topic_score`, ties by
    /// descending `total_score`, then ascending `canonical_name`.
    pub fn score_topics(
        &self,
        clusters: Vec<NormalizedTopic>,
        now: DateTime<Utc>,
    ) -> Vec<Topic> {
        let mut topics: Vec<Topic> = clusters
            .into_iter()
            .map(|cluster| {
                let mut topic = cluster.topic;
                topic.avg_velocity = if cluster.posts.is_empty() {
                    0.0
                } else {
                    cluster
                        .posts
                        .iter()
                        .map(|p| self.post_velocity(p, now))
                        .sum::<f64>()
                        / cluster.posts.len() as f64
                };
                topic.topic_score = self.blend(&topic);
                topic
            })
            .collect();

        let max_score = topics.iter().map(|t| t.topic_score).fold(0.0, f64::max);

        for topic in &mut topics {
            topic.trending_strength = if max_score > 0.0 {
                (100.0 * topic.topic_score / max_score).clamp(0.0, 100.0)
            } else {
                0.0
            };
        }

        topics.sort_by(|a, b| {
            b.topic_score
                .partial_cmp(&a.topic_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.total_score.cmp(&a.total_score))
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });

        for (i, topic) in topics.iter_mut().enumerate() {
            topic.rank = (i + 1) as u32;
        }

        debug!(topics = topics.len(), max_score, "scoring complete");
        topics
    }
}

impl Default for TrendingScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}
