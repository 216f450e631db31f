//! Raw content items as supplied by a post source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw forum post, fetched per request and never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    /// Source-assigned identifier, unique within a batch
    pub id: String,

    /// Post title (the extraction surface)
    pub title: String,

    /// Self-text body, empty for link posts
    #[serde(default)]
    pub selftext: String,

    /// Net upvote score (can be negative)
    pub score: i64,

    /// Comment count
    pub num_comments: u64,

    /// Publication timestamp
    pub created_utc: DateTime<Utc>,

    /// Forum/subreddit the post was published in
    pub subreddit: String,

    /// Canonical link to the post
    pub url: String,
}

impl RawPost {
    /// Create a post with minimal fields; counters start at zero.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            selftext: String::new(),
            score: 0,
            num_comments: 0,
            created_utc: Utc::now(),
            subreddit: String::new(),
            url: String::new(),
        }
    }

    /// Set the self-text body.
    pub fn with_selftext(mut self, selftext: impl Into<String>) -> Self {
        self.selftext = selftext.into();
        self
    }

    /// Set the upvote score.
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    /// Set the comment count.
    pub fn with_comments(mut self, num_comments: u64) -> Self {
        self.num_comments = num_comments;
        self
    }

    /// Set the publication timestamp.
    pub fn with_created_utc(mut self, created_utc: DateTime<Utc>) -> Self {
        self.created_utc = created_utc;
        self
    }

    /// Set the subreddit.
    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self
    }

    /// Set the canonical URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Hours elapsed between publication and `now`, never negative.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let seconds = now.signed_duration_since(self.created_utc).num_seconds();
        (seconds.max(0) as f64) / 3600.0
    }

    /// Title and body joined for sentiment classification.
    pub fn text(&self) -> String {
        if self.selftext.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.selftext)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_post_builder() {
        let post = RawPost::new("abc123", "iPhone 17 announced")
            .with_score(512)
            .with_comments(97)
            .with_subreddit("apple")
            .with_url("https://example.com/abc123");

        assert_eq!(post.id, "abc123");
        assert_eq!(post.score, 512);
        assert_eq!(post.num_comments, 97);
        assert_eq!(post.subreddit, "apple");
    }

    #[test]
    fn test_age_hours() {
        let now = Utc::now();
        let post = RawPost::new("a", "t").with_created_utc(now - Duration::hours(6));
        assert!((post.age_hours(now) - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_age_hours_never_negative() {
        let now = Utc::now();
        let post = RawPost::new("a", "t").with_created_utc(now + Duration::hours(1));
        assert_eq!(post.age_hours(now), 0.0);
    }

    #[test]
    fn test_text_combines_title_and_body() {
        let link = RawPost::new("a", "Title only");
        assert_eq!(link.text(), "Title only");

        let text_post = RawPost::new("b", "Title").with_selftext("Body");
        assert_eq!(text_post.text(), "Title\nBody");
    }
}
