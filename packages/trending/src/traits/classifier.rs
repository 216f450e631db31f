//! Sentiment classifier trait.

use async_trait::async_trait;

use crate::error::ClassifierResult;
use crate::types::sentiment::Sentiment;

/// Classifies a text's sentiment polarity.
///
/// A classifier is typically expensive to construct (model load, remote
/// session) and cheap to call: build it once and inject it by reference into
/// the engine, which reuses it across every `classify` call of every
/// request.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a single text.
    async fn classify(&self, text: &str) -> ClassifierResult<Sentiment>;

    /// Classifier name for logging/debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}
