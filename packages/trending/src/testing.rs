//! Testing utilities including mock capability implementations.
//!
//! These are useful for testing applications that use the engine without
//! making real network or model calls. All mocks share state through `Arc`,
//! so a clone handed to the engine stays inspectable from the test.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{ClassifierError, ClassifierResult, SourceError, SourceResult};
use crate::error::{EnricherError, EnricherResult};
use crate::traits::classifier::SentimentClassifier;
use crate::traits::enricher::ComponentEnricher;
use crate::traits::source::PostSource;
use crate::types::post::RawPost;
use crate::types::sentiment::{ComponentSentiment, Sentiment, SentimentLabel};

/// A mock post source with predefined batches.
///
/// `fetch_posts` returns the batch registered for a category (empty when
/// none). `fetch_posts_matching` returns explicit per-term fixtures when
/// registered, otherwise falls back to scanning every batch for titles
/// containing a term — which is usually what a scenario wants.
#[derive(Default, Clone)]
pub struct MockPostSource {
    batches: Arc<RwLock<HashMap<String, Vec<RawPost>>>>,
    matching: Arc<RwLock<HashMap<String, Vec<RawPost>>>>,
    fail_categories: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<MockSourceCall>>>,
}

/// Record of a call made to the mock source.
#[derive(Debug, Clone)]
pub enum MockSourceCall {
    FetchPosts {
        category: String,
        time_window_hours: u32,
    },
    FetchMatching {
        terms: Vec<String>,
        time_window_hours: u32,
    },
}

impl MockPostSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the batch returned for a category.
    pub fn with_posts(self, category: impl Into<String>, posts: Vec<RawPost>) -> Self {
        self.batches.write().unwrap().insert(category.into(), posts);
        self
    }

    /// Register an explicit result for a search term (case-insensitive).
    pub fn with_matching(self, term: impl Into<String>, posts: Vec<RawPost>) -> Self {
        self.matching
            .write()
            .unwrap()
            .insert(term.into().to_lowercase(), posts);
        self
    }

    /// Make `fetch_posts` fail for a category.
    pub fn fail_category(self, category: impl Into<String>) -> Self {
        self.fail_categories.write().unwrap().insert(category.into());
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<MockSourceCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of `fetch_posts_matching` calls.
    pub fn matching_call_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockSourceCall::FetchMatching { .. }))
            .count()
    }
}

#[async_trait]
impl PostSource for MockPostSource {
    async fn fetch_posts(
        &self,
        category: &str,
        time_window_hours: u32,
    ) -> SourceResult<Vec<RawPost>> {
        self.calls.write().unwrap().push(MockSourceCall::FetchPosts {
            category: category.to_string(),
            time_window_hours,
        });

        if self.fail_categories.read().unwrap().contains(category) {
            return Err(SourceError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ))));
        }

        Ok(self
            .batches
            .read()
            .unwrap()
            .get(category)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_posts_matching(
        &self,
        terms: &[String],
        time_window_hours: u32,
    ) -> SourceResult<Vec<RawPost>> {
        self.calls
            .write()
            .unwrap()
            .push(MockSourceCall::FetchMatching {
                terms: terms.to_vec(),
                time_window_hours,
            });

        let mut results: Vec<RawPost> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        // Explicit fixtures first.
        let matching = self.matching.read().unwrap();
        let mut had_explicit = false;
        for term in terms {
            if let Some(posts) = matching.get(&term.to_lowercase()) {
                had_explicit = true;
                for post in posts {
                    if seen.insert(post.id.clone()) {
                        results.push(post.clone());
                    }
                }
            }
        }
        drop(matching);

        // Fallback: scan batches for titles containing any term.
        if !had_explicit {
            let batches = self.batches.read().unwrap();
            for posts in batches.values() {
                for post in posts {
                    let title = post.title.to_lowercase();
                    if terms.iter().any(|t| title.contains(&t.to_lowercase()))
                        && seen.insert(post.id.clone())
                    {
                        results.push(post.clone());
                    }
                }
            }
        }

        Ok(results)
    }

    fn name(&self) -> &str {
        "mock-source"
    }
}

/// A mock classifier driven by substring rules.
///
/// Rules are checked in insertion order; the first matching substring wins,
/// everything else is neutral. Texts matching a failure substring return an
/// error, which the aggregator skips per post.
#[derive(Default, Clone)]
pub struct MockClassifier {
    rules: Arc<RwLock<Vec<(String, Sentiment)>>>,
    fail_substrings: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<usize>>,
}

impl MockClassifier {
    /// Create a classifier that labels everything neutral.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label texts containing `substring` (case-insensitive) with `label`.
    pub fn with_rule(self, substring: impl Into<String>, label: SentimentLabel) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((substring.into().to_lowercase(), Sentiment::new(label, 0.9)));
        self
    }

    /// Fail classification of texts containing `substring`.
    pub fn fail_on(self, substring: impl Into<String>) -> Self {
        self.fail_substrings
            .write()
            .unwrap()
            .push(substring.into().to_lowercase());
        self
    }

    /// Number of classify calls made.
    pub fn call_count(&self) -> usize {
        *self.calls.read().unwrap()
    }
}

#[async_trait]
impl SentimentClassifier for MockClassifier {
    async fn classify(&self, text: &str) -> ClassifierResult<Sentiment> {
        *self.calls.write().unwrap() += 1;
        let lower = text.to_lowercase();

        if self
            .fail_substrings
            .read()
            .unwrap()
            .iter()
            .any(|s| lower.contains(s))
        {
            return Err(ClassifierError::Failed("mock classification failure".to_string()));
        }

        for (substring, sentiment) in self.rules.read().unwrap().iter() {
            if lower.contains(substring) {
                return Ok(sentiment.clone());
            }
        }
        Ok(Sentiment::new(SentimentLabel::Neutral, 0.5))
    }

    fn name(&self) -> &str {
        "mock-classifier"
    }
}

/// A mock component enricher with per-topic fixtures and failure injection.
#[derive(Default, Clone)]
pub struct MockEnricher {
    components: Arc<RwLock<HashMap<String, Vec<ComponentSentiment>>>>,
    fail_topics: Arc<RwLock<HashSet<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockEnricher {
    /// Create an enricher that returns a generic component for any topic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register components returned for a topic.
    pub fn with_components(
        self,
        topic_name: impl Into<String>,
        components: Vec<ComponentSentiment>,
    ) -> Self {
        self.components
            .write()
            .unwrap()
            .insert(topic_name.into(), components);
        self
    }

    /// Make enrichment fail for a topic.
    pub fn fail_topic(self, topic_name: impl Into<String>) -> Self {
        self.fail_topics.write().unwrap().insert(topic_name.into());
        self
    }

    /// Delay every call (for timeout tests).
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write().unwrap() = Some(delay);
        self
    }

    /// Topic names this mock was called for.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    fn default_components() -> Vec<ComponentSentiment> {
        vec![ComponentSentiment {
            component: "overall".to_string(),
            sentiment: SentimentLabel::Neutral,
            confidence: 0.5,
            summary: "default mock component".to_string(),
            mention_count: 1,
        }]
    }
}

#[async_trait]
impl ComponentEnricher for MockEnricher {
    async fn analyze_components(
        &self,
        topic_name: &str,
        _sample_posts: &[RawPost],
    ) -> EnricherResult<Vec<ComponentSentiment>> {
        self.calls.write().unwrap().push(topic_name.to_string());

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_topics.read().unwrap().contains(topic_name) {
            return Err(EnricherError::Failed("mock enrichment failure".to_string()));
        }

        Ok(self
            .components
            .read()
            .unwrap()
            .get(topic_name)
            .cloned()
            .unwrap_or_else(Self::default_components))
    }

    fn name(&self) -> &str {
        "mock-enricher"
    }
}

/// Builder for populated mock worlds.
///
/// # Example
///
/// ```rust,ignore
/// let (source, classifier, enricher) = TestScenario::new()
///     .with_titles("gaming", &["Elden Ring 2 announced", "Elden Ring 2 trailer"])
///     .build();
/// ```
pub struct TestScenario {
    source: MockPostSource,
    classifier: MockClassifier,
    enricher: MockEnricher,
    next_id: usize,
}

impl TestScenario {
    /// Create an empty scenario.
    pub fn new() -> Self {
        Self {
            source: MockPostSource::new(),
            classifier: MockClassifier::new(),
            enricher: MockEnricher::new(),
            next_id: 0,
        }
    }

    /// Add posts with the given titles to a category. Posts get sequential
    /// ids, a small score, and a two-hour age.
    pub fn with_titles(mut self, category: &str, titles: &[&str]) -> Self {
        let created = Utc::now() - chrono::Duration::hours(2);
        let mut posts: Vec<RawPost> = self
            .source
            .batches
            .read()
            .unwrap()
            .get(category)
            .cloned()
            .unwrap_or_default();
        for title in titles {
            posts.push(
                RawPost::new(format!("post-{}", self.next_id), *title)
                    .with_score(10)
                    .with_comments(2)
                    .with_created_utc(created)
                    .with_subreddit(category),
            );
            self.next_id += 1;
        }
        self.source = self.source.with_posts(category, posts);
        self
    }

    /// Add fully-specified posts to a category.
    pub fn with_posts(mut self, category: &str, new_posts: Vec<RawPost>) -> Self {
        let mut posts: Vec<RawPost> = self
            .source
            .batches
            .read()
            .unwrap()
            .get(category)
            .cloned()
            .unwrap_or_default();
        posts.extend(new_posts);
        self.source = self.source.with_posts(category, posts);
        self
    }

    /// Add a classifier rule.
    pub fn with_rule(mut self, substring: &str, label: SentimentLabel) -> Self {
        self.classifier = self.classifier.with_rule(substring, label);
        self
    }

    /// Get all three mocks.
    pub fn build(self) -> (MockPostSource, MockClassifier, MockEnricher) {
        (self.source, self.classifier, self.enricher)
    }
}

impl Default for TestScenario {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_batches() {
        let source = MockPostSource::new()
            .with_posts("gaming", vec![RawPost::new("a", "Elden Ring 2 announced")]);

        let posts = source.fetch_posts("gaming", 24).await.unwrap();
        assert_eq!(posts.len(), 1);

        let empty = source.fetch_posts("cooking", 24).await.unwrap();
        assert!(empty.is_empty());

        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_source_fail_category() {
        let source = MockPostSource::new().fail_category("gaming");
        assert!(source.fetch_posts("gaming", 24).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_source_matching_fallback_scans_titles() {
        let source = MockPostSource::new().with_posts(
            "tech",
            vec![
                RawPost::new("a", "iPhone 17 review"),
                RawPost::new("b", "Pixel 10 review"),
            ],
        );

        let matched = source
            .fetch_posts_matching(&["iphone 17".to_string()], 24)
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "a");
    }

    #[tokio::test]
    async fn test_mock_source_matching_dedups_by_id() {
        let post = RawPost::new("a", "iPhone 17 Pro review");
        let source = MockPostSource::new()
            .with_matching("iphone 17", vec![post.clone()])
            .with_matching("iphone 17 pro", vec![post]);

        let matched = source
            .fetch_posts_matching(
                &["iPhone 17".to_string(), "iPhone 17 Pro".to_string()],
                24,
            )
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_classifier_rules_in_order() {
        let classifier = MockClassifier::new()
            .with_rule("love", SentimentLabel::Positive)
            .with_rule("hate", SentimentLabel::Negative);

        let positive = classifier.classify("I love this").await.unwrap();
        assert_eq!(positive.label, SentimentLabel::Positive);

        let neutral = classifier.classify("no opinion").await.unwrap();
        assert_eq!(neutral.label, SentimentLabel::Neutral);

        assert_eq!(classifier.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_classifier_failure_injection() {
        let classifier = MockClassifier::new().fail_on("poison");
        assert!(classifier.classify("poison text").await.is_err());
        assert!(classifier.classify("fine text").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_enricher_fixtures_and_failures() {
        let enricher = MockEnricher::new()
            .with_components(
                "iPhone 17",
                vec![ComponentSentiment {
                    component: "camera".to_string(),
                    sentiment: SentimentLabel::Positive,
                    confidence: 0.9,
                    summary: "praised".to_string(),
                    mention_count: 2,
                }],
            )
            .fail_topic("Pixel 10");

        let components = enricher.analyze_components("iPhone 17", &[]).await.unwrap();
        assert_eq!(components[0].component, "camera");

        assert!(enricher.analyze_components("Pixel 10", &[]).await.is_err());

        // Unknown topics get the default component.
        let default = enricher.analyze_components("Other", &[]).await.unwrap();
        assert_eq!(default[0].component, "overall");

        assert_eq!(enricher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_scenario_builder() {
        let (source, classifier, _enricher) = TestScenario::new()
            .with_titles("gaming", &["Elden Ring 2 announced", "Elden Ring 2 trailer"])
            .with_rule("announced", SentimentLabel::Positive)
            .build();

        let posts = source.fetch_posts("gaming", 24).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].subreddit, "gaming");

        let sentiment = classifier
            .classify("Elden Ring 2 announced")
            .await
            .unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Positive);
    }
}
