//! Trending-Topic Discovery and Ranking Engine
//!
//! A stateless library that turns a window of recent forum posts into a
//! ranked, sentiment-annotated list of trending topics:
//!
//! 1. **Extract** candidate subject phrases from titles with an ordered
//!    list of pattern matchers
//! 2. **Normalize** near-duplicate variants into canonical topics with
//!    alias sets
//! 3. **Score** topics by frequency, raw popularity, and momentum, and
//!    rank them
//! 4. **Aggregate** per-topic sentiment in parallel, with optional
//!    component-level enrichment and per-topic failure isolation
//!
//! # Design Philosophy
//!
//! - Capabilities (post source, classifier, enricher) are injected traits,
//!   not globals — build the expensive ones once, reuse across requests
//! - Phrase matching is heuristic (pattern + containment), not semantic
//! - Each request is a fresh computation; no cross-request state
//! - A request either fully succeeds (possibly with per-topic degraded
//!   enrichment) or fails with one structured error
//!
//! # Usage
//!
//! ```rust,ignore
//! use trending::{DiscoveryRequest, LexiconClassifier, RedditSource, TrendingEngine};
//!
//! let engine = TrendingEngine::new(RedditSource::new(), LexiconClassifier::new()?);
//! let report = engine
//!     .discover(DiscoveryRequest::new("technology").with_top_n(5))
//!     .await?;
//!
//! for entry in &report.topics {
//!     println!("#{} {} ({:.0})", entry.topic.rank, entry.topic.canonical_name,
//!         entry.topic.trending_strength);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - capability abstractions (PostSource, SentimentClassifier,
//!   ComponentEnricher)
//! - [`types`] - data model
//! - [`extract`] - title pattern matchers and candidate extraction
//! - [`normalize`] - alias merging into canonical topics
//! - [`scoring`] - velocity, score blend, ranking
//! - [`pipeline`] - the engine and its parallel aggregation stage
//! - [`classifiers`] / [`sources`] / [`enrichers`] - reference capability
//!   implementations
//! - [`testing`] - mock implementations for testing

pub mod classifiers;
pub mod enrichers;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod scoring;
pub mod sources;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    ClassifierError, EnricherError, Result, SourceError, TrendingError,
};
pub use traits::{ComponentEnricher, PostSource, SentimentClassifier};
pub use types::{
    ComponentSentiment, DiscoveryRequest, EngineConfig, NormalizedTopic, RawPost, ScoringWeights,
    Sentiment, SentimentLabel, SentimentSummary, Topic, TopicCandidate, TrendingReport,
    TrendingTopic,
};

// Re-export the engine and pipeline building blocks
pub use extract::{default_patterns, extract_candidates, TitlePattern};
pub use normalize::normalize_candidates;
pub use pipeline::TrendingEngine;
pub use scoring::TrendingScorer;

// Re-export reference implementations
pub use classifiers::LexiconClassifier;
pub use sources::RedditSource;

#[cfg(feature = "openai")]
pub use enrichers::OpenAiEnricher;

// Re-export testing utilities
pub use testing::{MockClassifier, MockEnricher, MockPostSource, TestScenario};
