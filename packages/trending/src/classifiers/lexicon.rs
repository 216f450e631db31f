//! Lexicon-based sentiment classifier.
//!
//! The default in-process classifier: two Aho-Corasick automata (positive
//! and negative word lists) compiled once at construction and reused across
//! every `classify` call. No model download, no network, deterministic
//! output — a reasonable baseline where a trained model is not available.

use aho_corasick::AhoCorasick;
use async_trait::async_trait;

use crate::error::{ClassifierError, ClassifierResult};
use crate::traits::classifier::SentimentClassifier;
use crate::types::sentiment::{Sentiment, SentimentLabel};

const DEFAULT_POSITIVE: &[&str] = &[
    "good", "great", "excellent", "love", "amazing", "wonderful", "happy", "fantastic", "awesome",
    "best", "impressive", "beautiful", "excited", "incredible", "perfect", "brilliant", "enjoy",
    "win", "solid", "recommend",
];

const DEFAULT_NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "hate", "horrible", "worst", "sad", "angry", "disappointed",
    "poor", "broken", "useless", "scam", "ugly", "fail", "failure", "annoying", "overpriced",
    "garbage", "regret",
];

/// In-process sentiment classifier over positive/negative lexicons.
pub struct LexiconClassifier {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    /// Build a classifier with the default lexicons.
    pub fn new() -> ClassifierResult<Self> {
        Self::with_lexicons(DEFAULT_POSITIVE, DEFAULT_NEGATIVE)
    }

    /// Build a classifier with custom word lists.
    pub fn with_lexicons(positive: &[&str], negative: &[&str]) -> ClassifierResult<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(positive)
            .map_err(|e| {
                ClassifierError::Unavailable(format!("failed to build positive matcher: {e}"))
            })?;
        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(negative)
            .map_err(|e| {
                ClassifierError::Unavailable(format!("failed to build negative matcher: {e}"))
            })?;

        Ok(Self { positive, negative })
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> ClassifierResult<Sentiment> {
        let positive_hits = self.positive.find_iter(text).count() as f32;
        let negative_hits = self.negative.find_iter(text).count() as f32;
        let total = positive_hits + negative_hits;

        if total == 0.0 || (positive_hits - negative_hits).abs() < f32::EPSILON {
            return Ok(Sentiment::new(SentimentLabel::Neutral, 0.5));
        }

        let (label, score) = if positive_hits > negative_hits {
            (SentimentLabel::Positive, positive_hits / total)
        } else {
            (SentimentLabel::Negative, negative_hits / total)
        };

        Ok(Sentiment::new(label, score))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_positive_text() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier
            .classify("This phone is great, the camera is amazing")
            .await
            .unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.5);
    }

    #[tokio::test]
    async fn test_negative_text() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier
            .classify("terrible update, everything is broken")
            .await
            .unwrap();
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_neutral_without_hits() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier.classify("the event starts on Monday").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.5);
    }

    #[tokio::test]
    async fn test_neutral_on_tied_hits() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier
            .classify("good screen but terrible battery")
            .await
            .unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn test_case_insensitive_matching() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier.classify("GREAT launch, LOVE it").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_custom_lexicons() {
        let classifier = LexiconClassifier::with_lexicons(&["bullish"], &["bearish"]).unwrap();
        let result = classifier.classify("very bullish on this").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 1.0);
    }
}
