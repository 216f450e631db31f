//! Title pattern matchers.
//!
//! Each matcher implements [`TitlePattern`](super::TitlePattern) and is
//! applied in order by the extractor. Matching is heuristic by design:
//! pattern + casing shape, not semantics, so a phrase can be noisy and a
//! phrase can be missed. Frequency across a batch is what separates topics
//! from noise.

use regex::Regex;

use super::TitlePattern;

// Token that starts a product/proper name. Allows a short lowercase prefix
// before the first capital so camel-case brands ("iPhone", "eBay") match.
const NAME_TOKEN: &str = r"(?:[A-Z]|[a-z]{1,2}[A-Z])[A-Za-z0-9]*";

/// Capitalized name followed by a version number, with optional edition
/// suffixes: "iPhone 17", "GPT 5", "iPhone 17 Pro Max".
pub struct VersionedNamePattern {
    regex: Regex,
}

impl VersionedNamePattern {
    pub fn new() -> Self {
        let pattern = format!(
            r"\b{t}(?:\s+{t}){{0,3}}\s+v?\d{{1,4}}(?:\.\d+)*(?:\s+(?:Pro|Max|Plus|Ultra|Mini|Air|SE|XL))*\b",
            t = NAME_TOKEN
        );
        Self {
            regex: Regex::new(&pattern).expect("versioned-name pattern is valid"),
        }
    }
}

impl Default for VersionedNamePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePattern for VersionedNamePattern {
    fn name(&self) -> &'static str {
        "versioned-name"
    }

    fn matches(&self, title: &str) -> Vec<String> {
        self.regex
            .find_iter(title)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Capitalized name followed by a four-digit year: "World Cup 2026",
/// "Olympics 2028".
pub struct NameYearPattern {
    regex: Regex,
}

impl NameYearPattern {
    pub fn new() -> Self {
        let pattern = format!(
            r"\b{t}(?:\s+{t}){{0,4}}\s+(?:19|20)\d{{2}}\b",
            t = NAME_TOKEN
        );
        Self {
            regex: Regex::new(&pattern).expect("name-year pattern is valid"),
        }
    }
}

impl Default for NameYearPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePattern for NameYearPattern {
    fn name(&self) -> &'static str {
        "name-year"
    }

    fn matches(&self, title: &str) -> Vec<String> {
        self.regex
            .find_iter(title)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// Forum-meta acronyms that read like topics but aren't.
const ACRONYM_STOPLIST: &[&str] = &[
    "TIL", "AMA", "PSA", "LPT", "TIFU", "IMO", "IMHO", "TLDR", "FYI", "ICYMI", "OMG", "WTF",
];

/// Standalone acronym of 3-6 uppercase letters: "NASA", "FIFA".
pub struct AcronymPattern {
    regex: Regex,
}

impl AcronymPattern {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(r"\b[A-Z]{3,6}\b").expect("acronym pattern is valid"),
        }
    }
}

impl Default for AcronymPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePattern for AcronymPattern {
    fn name(&self) -> &'static str {
        "acronym"
    }

    fn matches(&self, title: &str) -> Vec<String> {
        self.regex
            .find_iter(title)
            .map(|m| m.as_str())
            .filter(|acronym| !ACRONYM_STOPLIST.contains(acronym))
            .map(|acronym| acronym.to_string())
            .collect()
    }
}

/// Generic run of two or more capitalized words: "World Cup",
/// "Taylor Swift", "Baldur's Gate". The fallback matcher — apply it last.
pub struct CapitalizedPhrasePattern {
    regex: Regex,
}

impl CapitalizedPhrasePattern {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(r"\b[A-Z][A-Za-z0-9']+(?:\s+[A-Z][A-Za-z0-9']+)+\b")
                .expect("capitalized-phrase pattern is valid"),
        }
    }
}

impl Default for CapitalizedPhrasePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePattern for CapitalizedPhrasePattern {
    fn name(&self) -> &'static str {
        "capitalized-phrase"
    }

    fn matches(&self, title: &str) -> Vec<String> {
        self.regex
            .find_iter(title)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
