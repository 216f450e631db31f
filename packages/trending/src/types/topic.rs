//! Topic entities produced by extraction and normalization.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::post::RawPost;

/// A candidate subject phrase extracted from one post title.
///
/// Candidates are a working set between extraction and normalization and are
/// discarded once topics exist. Duplicates across posts are preserved on
/// purpose — frequency is signal.
#[derive(Debug, Clone)]
pub struct TopicCandidate<'a> {
    /// The extracted phrase, trimmed of surrounding punctuation
    pub phrase: String,

    /// The post the phrase was extracted from
    pub post: &'a RawPost,
}

impl<'a> TopicCandidate<'a> {
    /// Create a candidate for a phrase found in `post`'s title.
    pub fn new(phrase: impl Into<String>, post: &'a RawPost) -> Self {
        Self {
            phrase: phrase.into(),
            post,
        }
    }
}

/// A canonical discussion subject with its alias phrases and aggregated
/// engagement counters.
///
/// Created by the normalizer, scored and ranked by the scorer, frozen
/// afterwards. `rank` is 0 until the scorer assigns the 1..N sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// The longest phrase among the alias group (ties broken by post
    /// support, then lexicographically)
    pub canonical_name: String,

    /// All raw phrase variants merged into this topic, canonical included.
    /// Never empty.
    pub aliases: BTreeSet<String>,

    /// Number of distinct contributing posts (never double-counted across
    /// aliases)
    pub post_count: usize,

    /// Sum of upvote scores over distinct contributing posts
    pub total_score: i64,

    /// Sum of comment counts over distinct contributing posts
    pub total_comments: u64,

    /// Mean per-post engagement velocity (set by the scorer)
    pub avg_velocity: f64,

    /// Blended trending score (set by the scorer)
    pub topic_score: f64,

    /// Score normalized to 0–100 against the batch maximum (set by the
    /// scorer)
    pub trending_strength: f64,

    /// Position in the batch ranking, 1-based and gap-free; 0 until ranked
    pub rank: u32,

    /// Subreddits the contributing posts were published in
    pub subreddits: BTreeSet<String>,

    /// Earliest contributing post timestamp
    pub earliest_post: DateTime<Utc>,

    /// Latest contributing post timestamp
    pub latest_post: DateTime<Utc>,
}

impl Topic {
    /// Whether `phrase` equals the canonical name or any alias
    /// (case-insensitive).
    pub fn matches_phrase(&self, phrase: &str) -> bool {
        let needle = phrase.to_lowercase();
        self.canonical_name.to_lowercase() == needle
            || self.aliases.iter().any(|a| a.to_lowercase() == needle)
    }

    /// Canonical name plus all aliases, for matching re-fetches.
    pub fn search_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = vec![self.canonical_name.clone()];
        for alias in &self.aliases {
            if alias != &self.canonical_name {
                terms.push(alias.clone());
            }
        }
        terms
    }
}

/// A normalized topic together with its distinct contributing posts.
///
/// The posts are carried only as far as the scorer (which needs per-post
/// velocities); the frozen [`Topic`] is what flows further down the pipeline.
#[derive(Debug, Clone)]
pub struct NormalizedTopic {
    pub topic: Topic,
    pub posts: Vec<RawPost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_with_aliases(canonical: &str, aliases: &[&str]) -> Topic {
        let mut alias_set: BTreeSet<String> = aliases.iter().map(|s| s.to_string()).collect();
        alias_set.insert(canonical.to_string());
        Topic {
            canonical_name: canonical.to_string(),
            aliases: alias_set,
            post_count: 1,
            total_score: 0,
            total_comments: 0,
            avg_velocity: 0.0,
            topic_score: 0.0,
            trending_strength: 0.0,
            rank: 0,
            subreddits: BTreeSet::new(),
            earliest_post: Utc::now(),
            latest_post: Utc::now(),
        }
    }

    #[test]
    fn test_matches_phrase_case_insensitive() {
        let topic = topic_with_aliases("iPhone 17 Pro", &["iPhone 17"]);
        assert!(topic.matches_phrase("iphone 17"));
        assert!(topic.matches_phrase("IPHONE 17 PRO"));
        assert!(!topic.matches_phrase("Pixel 10"));
    }

    #[test]
    fn test_search_terms_puts_canonical_first() {
        let topic = topic_with_aliases("iPhone 17 Pro", &["iPhone 17"]);
        let terms = topic.search_terms();
        assert_eq!(terms[0], "iPhone 17 Pro");
        assert!(terms.contains(&"iPhone 17".to_string()));
        assert_eq!(terms.len(), 2);
    }
}
