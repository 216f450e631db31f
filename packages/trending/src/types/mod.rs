//! Data model for the trending engine.

pub mod config;
pub mod post;
pub mod report;
pub mod sentiment;
pub mod topic;

pub use config::{DiscoveryRequest, EngineConfig, ScoringWeights};
pub use post::RawPost;
pub use report::{TrendingReport, TrendingTopic};
pub use sentiment::{ComponentSentiment, Sentiment, SentimentLabel, SentimentSummary};
pub use topic::{NormalizedTopic, Topic, TopicCandidate};
