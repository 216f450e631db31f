//! Reddit-backed post source.
//!
//! Reference implementation of [`PostSource`] over the public Reddit JSON
//! listing API. No authentication: the listing endpoints are public but
//! rate-limited, so every request waits on a `governor` limiter and sends a
//! descriptive user agent.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::{debug, warn};

use crate::error::{SourceError, SourceResult};
use crate::traits::source::PostSource;
use crate::types::post::RawPost;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Maximum terms folded into one search query; more just dilutes the search.
const MAX_SEARCH_TERMS: usize = 4;

/// Post source backed by the public Reddit JSON API.
///
/// # Example
///
/// ```rust,ignore
/// let source = RedditSource::new().with_user_agent("trending-bot/0.1");
/// let posts = source.fetch_posts("technology", 24).await?;
/// ```
pub struct RedditSource {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    limiter: Arc<DirectRateLimiter>,
}

impl RedditSource {
    /// Create a source with default settings (1 request/second).
    pub fn new() -> Self {
        let quota = Quota::per_second(NonZeroU32::new(1).expect("quota is nonzero"));
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to create HTTP client"),
            base_url: "https://www.reddit.com".to_string(),
            user_agent: "trending-engine/0.1".to_string(),
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the sustained request rate.
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second.max(1)).expect("quota is nonzero"),
        );
        self.limiter = Arc::new(RateLimiter::direct(quota));
        self
    }

    async fn get_listing(&self, url: &str, query: &[(&str, &str)]) -> SourceResult<Vec<RawPost>> {
        self.limiter.until_ready().await;

        debug!(url = %url, "reddit fetch starting");
        let response = self
            .client
            .get(url)
            .query(query)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP {status}"),
            ))));
        }

        let listing: Listing = response.json().await.map_err(|e| SourceError::Malformed {
            endpoint: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut posts = Vec::with_capacity(listing.data.children.len());
        for child in listing.data.children {
            match child.data.into_raw_post(&self.base_url) {
                Some(post) => posts.push(post),
                None => warn!(url = %url, "skipping listing entry with invalid timestamp"),
            }
        }
        Ok(posts)
    }
}

impl Default for RedditSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostSource for RedditSource {
    async fn fetch_posts(
        &self,
        category: &str,
        time_window_hours: u32,
    ) -> SourceResult<Vec<RawPost>> {
        let url = format!("{}/r/{}/new.json", self.base_url, category);
        let posts = self.get_listing(&url, &[("limit", "100")]).await?;
        let posts = filter_window(posts, time_window_hours);
        debug!(
            category = %category,
            window_h = time_window_hours,
            posts = posts.len(),
            "reddit listing fetched"
        );
        Ok(posts)
    }

    async fn fetch_posts_matching(
        &self,
        terms: &[String],
        time_window_hours: u32,
    ) -> SourceResult<Vec<RawPost>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let query = terms
            .iter()
            .take(MAX_SEARCH_TERMS)
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(" OR ");
        let t_param = search_time_param(time_window_hours);

        let url = format!("{}/search.json", self.base_url);
        let posts = self
            .get_listing(
                &url,
                &[
                    ("q", query.as_str()),
                    ("sort", "new"),
                    ("limit", "100"),
                    ("t", t_param),
                ],
            )
            .await?;
        Ok(filter_window(posts, time_window_hours))
    }

    fn name(&self) -> &str {
        "reddit"
    }
}

/// Coarse `t=` bucket for the search endpoint; exact windowing happens
/// client-side in [`filter_window`].
fn search_time_param(time_window_hours: u32) -> &'static str {
    match time_window_hours {
        0..=1 => "hour",
        2..=24 => "day",
        _ => "week",
    }
}

fn filter_window(posts: Vec<RawPost>, time_window_hours: u32) -> Vec<RawPost> {
    let cutoff = Utc::now() - Duration::hours(i64::from(time_window_hours));
    posts
        .into_iter()
        .filter(|p| p.created_utc >= cutoff)
        .collect()
}

// Listing DTOs; only the fields the engine consumes.

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: ListingPost,
}

#[derive(Debug, Deserialize)]
struct ListingPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    created_utc: f64,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    permalink: String,
}

impl ListingPost {
    fn into_raw_post(self, base_url: &str) -> Option<RawPost> {
        let created = DateTime::<Utc>::from_timestamp(self.created_utc as i64, 0)?;
        Some(RawPost {
            id: self.id,
            title: self.title,
            selftext: self.selftext,
            score: self.score,
            num_comments: self.num_comments,
            created_utc: created,
            subreddit: self.subreddit,
            url: format!("{}{}", base_url, self.permalink),
        })
    }
}
