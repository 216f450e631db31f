//! Topic candidate extraction - the first pipeline stage.
//!
//! A pure pass over a batch of posts: every title is run through an ordered
//! list of [`TitlePattern`] matchers and each hit becomes a
//! [`TopicCandidate`]. Duplicates across posts are preserved (frequency is
//! what the scorer feeds on); duplicates within one post are collapsed so a
//! phrase found by two patterns cannot double-count its post downstream.

pub mod patterns;

use std::collections::HashSet;

use tracing::debug;

use crate::types::post::RawPost;
use crate::types::topic::TopicCandidate;

pub use patterns::{
    AcronymPattern, CapitalizedPhrasePattern, NameYearPattern, VersionedNamePattern,
};

/// Minimum candidate length after trimming punctuation/whitespace.
const MIN_PHRASE_LEN: usize = 3;

// Words that carry no subject on their own. A phrase consisting solely of
// these is discarded; checked case-insensitively.
const TITLE_STOPWORDS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "our", "his", "her", "its",
    "their", "what", "when", "where", "which", "who", "why", "how", "is", "are", "was", "were",
    "will", "would", "should", "could", "can", "do", "does", "did", "has", "have", "had", "not",
    "no", "yes", "new", "just", "breaking", "update", "updated", "official", "first", "last",
    "best", "worst", "top", "you", "we", "they", "it", "and", "or", "but", "if", "then", "so",
    "because", "about", "after", "before", "over", "under", "with", "without", "here", "there",
    "now", "today", "tomorrow", "yesterday",
];

/// A single title matcher.
///
/// Implementations are pure: `matches` inspects a title and returns the
/// phrases it found, in order of appearance. Matchers are applied as an
/// ordered list so new patterns can be added and tested in isolation.
pub trait TitlePattern: Send + Sync {
    /// Matcher name for logging/debugging.
    fn name(&self) -> &'static str;

    /// Return every candidate phrase found in `title`.
    fn matches(&self, title: &str) -> Vec<String>;
}

/// The default matcher list, most specific first.
pub fn default_patterns() -> Vec<Box<dyn TitlePattern>> {
    vec![
        Box::new(VersionedNamePattern::new()),
        Box::new(NameYearPattern::new()),
        Box::new(AcronymPattern::new()),
        Box::new(CapitalizedPhrasePattern::new()),
    ]
}

/// Extract topic candidates from a batch of posts.
///
/// Pure function: no side effects beyond a debug log of the candidate count.
pub fn extract_candidates<'a>(
    posts: &'a [RawPost],
    patterns: &[Box<dyn TitlePattern>],
) -> Vec<TopicCandidate<'a>> {
    let mut candidates = Vec::new();

    for post in posts {
        // Collapse within-post duplicates across patterns.
        let mut seen: HashSet<String> = HashSet::new();

        for pattern in patterns {
            for raw in pattern.matches(&post.title) {
                let phrase = clean_phrase(&raw);
                if !is_viable_phrase(&phrase) {
                    continue;
                }
                if seen.insert(phrase.to_lowercase()) {
                    candidates.push(TopicCandidate::new(phrase, post));
                }
            }
        }
    }

    debug!(
        posts = posts.len(),
        candidates = candidates.len(),
        "candidate extraction complete"
    );
    candidates
}

/// Trim surrounding punctuation/whitespace and collapse inner whitespace.
fn clean_phrase(raw: &str) -> String {
    raw.trim_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_viable_phrase(phrase: &str) -> bool {
    if phrase.len() < MIN_PHRASE_LEN {
        return false;
    }
    phrase
        .split_whitespace()
        .any(|token| !TITLE_STOPWORDS.contains(&token.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts_from_titles(titles: &[&str]) -> Vec<RawPost> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| RawPost::new(format!("p{i}"), *title))
            .collect()
    }

    #[test]
    fn test_extracts_from_every_matching_post() {
        let posts = posts_from_titles(&[
            "World Cup 2026 tickets on sale",
            "Referees announced for World Cup 2026",
            "nothing capitalized here",
        ]);
        let candidates = extract_candidates(&posts, &default_patterns());

        let world_cup: Vec<_> = candidates
            .iter()
            .filter(|c| c.phrase == "World Cup 2026")
            .collect();
        assert_eq!(world_cup.len(), 2);
        assert_ne!(world_cup[0].post.id, world_cup[1].post.id);
    }

    #[test]
    fn test_within_post_duplicates_collapse() {
        // "World Cup 2026" matches both the versioned-name and the
        // name-year patterns; one candidate must survive per post.
        let posts = posts_from_titles(&["World Cup 2026"]);
        let candidates = extract_candidates(&posts, &default_patterns());
        let count = candidates
            .iter()
            .filter(|c| c.phrase == "World Cup 2026")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_short_candidates_dropped() {
        // A cleaned phrase under 3 characters is rejected.
        assert!(!is_viable_phrase("Ab"));
        assert!(is_viable_phrase("GPT 5"));
    }

    #[test]
    fn test_lowercase_titles_yield_nothing() {
        let posts = posts_from_titles(&["on and on it goes"]);
        assert!(extract_candidates(&posts, &default_patterns()).is_empty());
    }

    #[test]
    fn test_all_stopword_phrases_dropped() {
        assert!(!is_viable_phrase("The Best"));
        assert!(is_viable_phrase("The Last Guardian"));
    }

    #[test]
    fn test_clean_phrase_trims_punctuation() {
        assert_eq!(clean_phrase("  iPhone 17," ), "iPhone 17");
        assert_eq!(clean_phrase("\"World Cup 2026\""), "World Cup 2026");
    }

    #[test]
    fn test_no_candidates_from_empty_batch() {
        let candidates = extract_candidates(&[], &default_patterns());
        assert!(candidates.is_empty());
    }
}
