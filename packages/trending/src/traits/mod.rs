//! Capability traits consumed by the pipeline.
//!
//! The engine is generic over these seams (explicit dependency injection):
//! - [`PostSource`] - content ingestion
//! - [`SentimentClassifier`] - per-text sentiment
//! - [`ComponentEnricher`] - optional component-level breakdown

pub mod classifier;
pub mod enricher;
pub mod source;

pub use classifier::SentimentClassifier;
pub use enricher::ComponentEnricher;
pub use source::PostSource;
