//! Sentiment classification and aggregation types.

use serde::{Deserialize, Serialize};

/// Sentiment polarity of a single text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Parse a label from its lowercase wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// A single classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    /// Polarity label
    pub label: SentimentLabel,

    /// Classifier confidence in [0, 1]
    pub score: f32,
}

impl Sentiment {
    /// Create a sentiment with the confidence clamped to [0, 1].
    pub fn new(label: SentimentLabel, score: f32) -> Self {
        Self {
            label,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Tally of classified posts for one topic.
///
/// `positive + negative + neutral` equals the number of posts that were
/// successfully classified for the topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl SentimentSummary {
    /// Record one classified post.
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    /// Total number of classified posts.
    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }

    /// The label with the highest count, or `None` for an empty summary.
    /// Ties resolve positive > negative > neutral.
    pub fn dominant(&self) -> Option<SentimentLabel> {
        if self.total() == 0 {
            return None;
        }
        let max = self.positive.max(self.negative).max(self.neutral);
        if self.positive == max {
            Some(SentimentLabel::Positive)
        } else if self.negative == max {
            Some(SentimentLabel::Negative)
        } else {
            Some(SentimentLabel::Neutral)
        }
    }
}

/// Externally-sourced sentiment breakdown for one sub-aspect of a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSentiment {
    /// Component name (e.g. "battery life")
    pub component: String,

    /// Aggregate polarity for the component
    pub sentiment: SentimentLabel,

    /// Enricher confidence in [0, 1]
    pub confidence: f32,

    /// Short free-text summary of what was said about the component
    pub summary: String,

    /// How many sampled posts mentioned the component
    pub mention_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_roundtrip() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ] {
            assert_eq!(SentimentLabel::parse(&label.to_string()), Some(label));
        }
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }

    #[test]
    fn test_summary_tally() {
        let mut summary = SentimentSummary::default();
        summary.record(SentimentLabel::Positive);
        summary.record(SentimentLabel::Positive);
        summary.record(SentimentLabel::Negative);
        summary.record(SentimentLabel::Neutral);

        assert_eq!(summary.positive, 2);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.neutral, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.dominant(), Some(SentimentLabel::Positive));
    }

    #[test]
    fn test_empty_summary_has_no_dominant() {
        assert_eq!(SentimentSummary::default().dominant(), None);
    }

    #[test]
    fn test_sentiment_score_clamped() {
        assert_eq!(Sentiment::new(SentimentLabel::Positive, 1.5).score, 1.0);
        assert_eq!(Sentiment::new(SentimentLabel::Negative, -0.1).score, 0.0);
    }
}
