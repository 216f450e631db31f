//! Property tests for the scorer and normalizer invariants.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use proptest::prelude::*;

use trending::types::topic::NormalizedTopic;
use trending::{normalize_candidates, RawPost, ScoringWeights, Topic, TopicCandidate, TrendingScorer};

fn cluster(name: String, posts: Vec<RawPost>) -> NormalizedTopic {
    let mut aliases = BTreeSet::new();
    aliases.insert(name.clone());
    let total_score = posts.iter().map(|p| p.score).sum();
    let total_comments = posts.iter().map(|p| p.num_comments).sum();
    NormalizedTopic {
        topic: Topic {
            canonical_name: name,
            aliases,
            post_count: posts.len(),
            total_score,
            total_comments,
            avg_velocity: 0.0,
            topic_score: 0.0,
            trending_strength: 0.0,
            rank: 0,
            subreddits: BTreeSet::new(),
            earliest_post: Utc::now(),
            latest_post: Utc::now(),
        },
        posts,
    }
}

proptest! {
    /// Ranks are always a gap-free 1..N sequence and strengths stay in
    /// [0, 100]; whenever the top score is positive it normalizes to
    /// exactly 100.
    #[test]
    fn ranks_gap_free_and_strength_bounded(
        specs in prop::collection::vec(
            (0i64..500, 0u64..200, 1usize..4, 1i64..48),
            1..12,
        )
    ) {
        let now = Utc::now();
        let clusters: Vec<NormalizedTopic> = specs
            .iter()
            .enumerate()
            .map(|(i, (score, comments, count, age_hours))| {
                let posts: Vec<RawPost> = (0..*count)
                    .map(|j| {
                        RawPost::new(format!("t{i}-p{j}"), "t")
                            .with_score(*score)
                            .with_comments(*comments)
                            .with_created_utc(now - Duration::hours(*age_hours))
                    })
                    .collect();
                cluster(format!("Topic {i}"), posts)
            })
            .collect();

        let ranked = TrendingScorer::new(ScoringWeights::default()).score_topics(clusters, now);

        let ranks: Vec<u32> = ranked.iter().map(|t| t.rank).collect();
        let expected: Vec<u32> = (1..=ranked.len() as u32).collect();
        prop_assert_eq!(ranks, expected);

        for topic in &ranked {
            prop_assert!(topic.trending_strength >= 0.0);
            prop_assert!(topic.trending_strength <= 100.0);
        }
        if ranked[0].topic_score > 0.0 {
            prop_assert!((ranked[0].trending_strength - 100.0).abs() < 1e-9);
        }
        // Scores are non-increasing down the ranking.
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].topic_score >= pair[1].topic_score);
        }
    }

    /// Re-normalizing a topic's own aliases never changes the canonical
    /// name or the distinct post count.
    #[test]
    fn normalizer_idempotent_over_aliases(
        base in "[A-Z][a-z]{2,8}",
        extension in "[A-Z][a-z]{2,8}",
    ) {
        let short = format!("{base} One");
        let long = format!("{base} One {extension}");
        let post_a = RawPost::new("a", "t");
        let post_b = RawPost::new("b", "t");

        let candidates = vec![
            TopicCandidate::new(short, &post_a),
            TopicCandidate::new(long, &post_b),
        ];
        let first = normalize_candidates(&candidates, 0.6, 1);
        prop_assert_eq!(first.len(), 1);
        let topic = first[0].topic.clone();

        let aliases: Vec<String> = topic.aliases.iter().cloned().collect();
        let posts = [&post_a, &post_b];
        let refed: Vec<TopicCandidate<'_>> = aliases
            .iter()
            .enumerate()
            .map(|(i, phrase)| TopicCandidate::new(phrase.clone(), posts[i % posts.len()]))
            .collect();

        let second = normalize_candidates(&refed, 0.6, 1);
        prop_assert_eq!(second.len(), 1);
        prop_assert_eq!(&second[0].topic.canonical_name, &topic.canonical_name);
        prop_assert_eq!(second[0].topic.post_count, topic.post_count);
    }
}
