//! Topic normalization - merging candidate phrase variants into canonical
//! topics.
//!
//! Phrases merge when one is a normalized substring of the other (at token
//! boundaries) or when their token overlap exceeds the configured threshold.
//! The canonical name is the longest raw phrase of the merged group, ties
//! broken by greatest distinct-post support, then lexicographically.
//!
//! Longest-phrase-wins can occasionally promote a noisier long variant
//! ("iPhone 17 Pro Max Review") over a cleaner short one; that trade-off is
//! deliberate and tunable only through the upstream patterns, not here.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::types::post::RawPost;
use crate::types::topic::{NormalizedTopic, Topic, TopicCandidate};

/// One distinct normalized phrase with every raw form and post that
/// produced it.
struct Variant<'a> {
    norm: String,
    tokens: BTreeSet<String>,
    /// raw form -> ids of distinct posts that emitted exactly that form
    forms: BTreeMap<String, BTreeSet<&'a str>>,
    /// id -> post, distinct contributing posts
    posts: BTreeMap<&'a str, &'a RawPost>,
}

/// Merge candidates into canonical topics and drop those under the
/// `min_posts` floor (a topic with exactly `min_posts` posts is kept).
pub fn normalize_candidates(
    candidates: &[TopicCandidate<'_>],
    merge_overlap_threshold: f64,
    min_posts: usize,
) -> Vec<NormalizedTopic> {
    let variants = collect_variants(candidates);
    let groups = merge_variants(variants, merge_overlap_threshold);

    let mut topics = Vec::new();
    let mut dropped = 0usize;
    for group in groups {
        let topic = build_topic(group);
        if topic.posts.len() >= min_posts {
            topics.push(topic);
        } else {
            dropped += 1;
        }
    }

    debug!(
        candidates = candidates.len(),
        topics = topics.len(),
        dropped_below_floor = dropped,
        "normalization complete"
    );
    topics
}

/// Lowercase and collapse whitespace.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_variants<'a>(candidates: &[TopicCandidate<'a>]) -> Vec<Variant<'a>> {
    let mut by_norm: HashMap<String, Variant<'a>> = HashMap::new();

    for candidate in candidates {
        let norm = normalize_phrase(&candidate.phrase);
        if norm.is_empty() {
            continue;
        }
        let entry = by_norm.entry(norm.clone()).or_insert_with(|| Variant {
            tokens: norm.split_whitespace().map(|t| t.to_string()).collect(),
            norm,
            forms: BTreeMap::new(),
            posts: BTreeMap::new(),
        });
        entry
            .forms
            .entry(candidate.phrase.clone())
            .or_default()
            .insert(candidate.post.id.as_str());
        entry.posts.insert(candidate.post.id.as_str(), candidate.post);
    }

    // Longest normalized phrase first so groups are seeded by the most
    // specific variant; secondary alphabetical order keeps merging
    // deterministic.
    let mut variants: Vec<Variant<'a>> = by_norm.into_values().collect();
    variants.sort_by(|a, b| {
        b.norm
            .len()
            .cmp(&a.norm.len())
            .then_with(|| a.norm.cmp(&b.norm))
    });
    variants
}

/// Greedy merge: each variant joins the first group it overlaps with, or
/// seeds a new one.
fn merge_variants(variants: Vec<Variant<'_>>, threshold: f64) -> Vec<Vec<Variant<'_>>> {
    let mut groups: Vec<Vec<Variant<'_>>> = Vec::new();

    for variant in variants {
        let target = groups.iter().position(|group| {
            group
                .iter()
                .any(|member| phrases_merge(member, &variant, threshold))
        });

        match target {
            Some(i) => groups[i].push(variant),
            None => groups.push(vec![variant]),
        }
    }

    groups
}

fn phrases_merge(a: &Variant<'_>, b: &Variant<'_>, threshold: f64) -> bool {
    contains_at_token_boundary(&a.norm, &b.norm)
        || contains_at_token_boundary(&b.norm, &a.norm)
        || token_overlap(&a.tokens, &b.tokens) > threshold
}

/// Whether `needle` appears in `haystack` as a whole-token run.
///
/// Plain substring containment would merge "phone 17" into "iphone 17";
/// padding both sides with spaces restricts matches to token boundaries.
fn contains_at_token_boundary(haystack: &str, needle: &str) -> bool {
    let padded_haystack = format!(" {haystack} ");
    let padded_needle = format!(" {needle} ");
    padded_haystack.contains(&padded_needle)
}

/// Jaccard overlap of two token sets.
fn token_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

fn build_topic(group: Vec<Variant<'_>>) -> NormalizedTopic {
    // All raw forms with their distinct-post support.
    let mut forms: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    let mut posts: BTreeMap<&str, &RawPost> = BTreeMap::new();
    for variant in &group {
        for (raw, ids) in &variant.forms {
            forms.entry(raw.clone()).or_default().extend(ids.iter());
        }
        for (id, post) in &variant.posts {
            posts.insert(*id, *post);
        }
    }

    let canonical_name = select_canonical(&forms);
    let aliases: BTreeSet<String> = forms.keys().cloned().collect();

    let mut total_score = 0i64;
    let mut total_comments = 0u64;
    let mut subreddits = BTreeSet::new();
    let mut earliest = None;
    let mut latest = None;
    for post in posts.values() {
        total_score += post.score;
        total_comments += post.num_comments;
        if !post.subreddit.is_empty() {
            subreddits.insert(post.subreddit.clone());
        }
        earliest = Some(match earliest {
            None => post.created_utc,
            Some(t) if post.created_utc < t => post.created_utc,
            Some(t) => t,
        });
        latest = Some(match latest {
            None => post.created_utc,
            Some(t) if post.created_utc > t => post.created_utc,
            Some(t) => t,
        });
    }

    let distinct_posts: Vec<RawPost> = posts.values().map(|p| (*p).clone()).collect();
    let earliest = earliest.unwrap_or_else(chrono::Utc::now);
    let latest = latest.unwrap_or(earliest);

    NormalizedTopic {
        topic: Topic {
            canonical_name,
            aliases,
            post_count: distinct_posts.len(),
            total_score,
            total_comments,
            avg_velocity: 0.0,
            topic_score: 0.0,
            trending_strength: 0.0,
            rank: 0,
            subreddits,
            earliest_post: earliest,
            latest_post: latest,
        },
        posts: distinct_posts,
    }
}

/// Longest raw phrase wins; ties go to greatest distinct-post support, then
/// to the lexicographically smaller phrase.
fn select_canonical(forms: &BTreeMap<String, BTreeSet<&str>>) -> String {
    let mut best: Option<(&String, usize)> = None;
    for (raw, ids) in forms {
        let support = ids.len();
        best = Some(match best {
            None => (raw, support),
            Some((cur, cur_support)) => {
                if raw.len() > cur.len()
                    || (raw.len() == cur.len() && support > cur_support)
                    || (raw.len() == cur.len() && support == cur_support && raw < cur)
                {
                    (raw, support)
                } else {
                    (cur, cur_support)
                }
            }
        });
    }
    best.map(|(raw, _)| raw.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::post::RawPost;

    const THRESHOLD: f64 = 0.6;

    fn candidates<'a>(pairs: &[(&str, &'a RawPost)]) -> Vec<TopicCandidate<'a>> {
        pairs
            .iter()
            .map(|(phrase, post)| TopicCandidate::new(*phrase, *post))
            .collect()
    }

    #[test]
    fn test_merges_substring_variants() {
        let post_a = RawPost::new("a", "iPhone 17 leaks").with_score(10);
        let post_b = RawPost::new("b", "iPhone 17 Pro leaks").with_score(20);
        let cands = candidates(&[("iPhone 17", &post_a), ("iPhone 17 Pro", &post_b)]);

        let topics = normalize_candidates(&cands, THRESHOLD, 1);
        assert_eq!(topics.len(), 1);

        let topic = &topics[0].topic;
        assert_eq!(topic.canonical_name, "iPhone 17 Pro");
        assert!(topic.aliases.contains("iPhone 17"));
        assert_eq!(topic.post_count, 2);
        assert_eq!(topic.total_score, 30);
    }

    #[test]
    fn test_no_false_merge_inside_token() {
        // "phone 17" is a plain substring of "iphone 17" but not at a token
        // boundary; the two must stay separate topics.
        let post_a = RawPost::new("a", "t");
        let post_b = RawPost::new("b", "t");
        let cands = candidates(&[("iPhone 17", &post_a), ("Phone 17", &post_b)]);

        let topics = normalize_candidates(&cands, 0.9, 1);
        assert_eq!(topics.len(), 2);
    }

    #[test]
    fn test_distinct_posts_not_double_counted() {
        // One post emitting two alias variants contributes once.
        let post = RawPost::new("a", "t").with_score(7).with_comments(3);
        let cands = candidates(&[("iPhone 17", &post), ("iPhone 17 Pro", &post)]);

        let topics = normalize_candidates(&cands, THRESHOLD, 1);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic.post_count, 1);
        assert_eq!(topics[0].topic.total_score, 7);
        assert_eq!(topics[0].topic.total_comments, 3);
    }

    #[test]
    fn test_min_posts_boundary() {
        let posts: Vec<RawPost> = (0..3)
            .map(|i| RawPost::new(format!("p{i}"), "t"))
            .collect();
        let pairs: Vec<(&str, &RawPost)> = posts.iter().map(|p| ("Topic One", p)).collect();
        let cands = candidates(&pairs);

        // post_count == min_posts is kept
        assert_eq!(normalize_candidates(&cands, THRESHOLD, 3).len(), 1);
        // post_count < min_posts is dropped
        assert!(normalize_candidates(&cands, THRESHOLD, 4).is_empty());
    }

    #[test]
    fn test_token_overlap_merge() {
        // No containment, but 2 of 3 distinct tokens shared:
        // {"world","cup","final"} vs {"world","cup","tickets"} -> 2/4 = 0.5
        let post_a = RawPost::new("a", "t");
        let post_b = RawPost::new("b", "t");
        let cands = candidates(&[("World Cup Final", &post_a), ("World Cup Tickets", &post_b)]);

        assert_eq!(normalize_candidates(&cands, 0.45, 1).len(), 1);
        assert_eq!(normalize_candidates(&cands, 0.6, 1).len(), 2);
    }

    #[test]
    fn test_canonical_tie_breaks() {
        // Same length, different support: support wins.
        let posts: Vec<RawPost> = (0..3)
            .map(|i| RawPost::new(format!("p{i}"), "t"))
            .collect();
        let cands = candidates(&[
            ("Cyber Monday", &posts[0]),
            ("Cyber Monday", &posts[1]),
            ("Cyber Sunday", &posts[2]),
        ]);
        let topics = normalize_candidates(&cands, 0.3, 1);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic.canonical_name, "Cyber Monday");
    }

    #[test]
    fn test_canonical_lexicographic_last_resort() {
        let post_a = RawPost::new("a", "t");
        let post_b = RawPost::new("b", "t");
        let cands = candidates(&[("Cyber Monday", &post_a), ("Cyber Sunday", &post_b)]);
        let topics = normalize_candidates(&cands, 0.3, 1);
        assert_eq!(topics.len(), 1);
        // Equal length, equal support -> lexicographically smaller
        assert_eq!(topics[0].topic.canonical_name, "Cyber Monday");
    }

    #[test]
    fn test_idempotent_over_own_aliases() {
        let post_a = RawPost::new("a", "t");
        let post_b = RawPost::new("b", "t");
        let cands = candidates(&[("iPhone 17", &post_a), ("iPhone 17 Pro", &post_b)]);
        let first = normalize_candidates(&cands, THRESHOLD, 1);
        let topic = &first[0].topic;

        // Re-feed the topic's aliases, one candidate per original post.
        let alias_vec: Vec<String> = topic.aliases.iter().cloned().collect();
        let refed: Vec<TopicCandidate<'_>> = alias_vec
            .iter()
            .zip([&post_a, &post_b])
            .map(|(phrase, post)| TopicCandidate::new(phrase.clone(), post))
            .collect();
        let second = normalize_candidates(&refed, THRESHOLD, 1);

        assert_eq!(second.len(), 1);
        assert_eq!(second[0].topic.canonical_name, topic.canonical_name);
        assert_eq!(second[0].topic.post_count, topic.post_count);
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("  iPhone   17  "), "iphone 17");
        assert_eq!(normalize_phrase("WORLD CUP"), "world cup");
    }

    #[test]
    fn test_case_insensitive_variants_share_topic() {
        let post_a = RawPost::new("a", "t");
        let post_b = RawPost::new("b", "t");
        let cands = candidates(&[("WORLD CUP", &post_a), ("World Cup", &post_b)]);
        let topics = normalize_candidates(&cands, THRESHOLD, 1);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic.post_count, 2);
        // Both raw spellings survive as aliases
        assert!(topics[0].topic.aliases.contains("WORLD CUP"));
        assert!(topics[0].topic.aliases.contains("World Cup"));
    }
}
