//! Per-topic sentiment aggregation - the only parallel pipeline stage.
//!
//! Each selected topic gets an independent task: re-fetch matching posts,
//! classify each, tally a summary, pick representative samples, and
//! optionally delegate the sample to the component enricher. Tasks run under
//! a bounded pool (`buffer_unordered`); network latency dominates, so five
//! workers keep the stage short without hammering upstreams.
//!
//! Failure policy: source and classifier failures propagate (core
//! capabilities), per-post classification errors are skipped with a warning,
//! and enricher failures or timeouts degrade only that topic's
//! `component_analysis` to `None`.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::classifier::SentimentClassifier;
use crate::traits::enricher::ComponentEnricher;
use crate::traits::source::PostSource;
use crate::types::config::{DiscoveryRequest, EngineConfig};
use crate::types::post::RawPost;
use crate::types::report::TrendingTopic;
use crate::types::sentiment::{ComponentSentiment, SentimentLabel, SentimentSummary};
use crate::types::topic::Topic;

/// Aggregate sentiment for the selected topics.
///
/// Returns one [`TrendingTopic`] per input topic, in task completion order —
/// the assembler re-sorts by rank. When `analyze_sentiment` is off the
/// summaries are all-zero and no network calls are made.
pub async fn aggregate_topics<S, C>(
    source: &S,
    classifier: &C,
    enricher: Option<&dyn ComponentEnricher>,
    topics: Vec<Topic>,
    request: &DiscoveryRequest,
    config: &EngineConfig,
) -> Result<Vec<TrendingTopic>>
where
    S: PostSource,
    C: SentimentClassifier,
{
    if !request.analyze_sentiment {
        return Ok(topics
            .into_iter()
            .map(|topic| TrendingTopic {
                topic,
                sentiment: SentimentSummary::default(),
                sample_posts: Vec::new(),
                component_analysis: None,
            })
            .collect());
    }

    let futures: Vec<_> = topics
        .into_iter()
        .map(|topic| aggregate_one(source, classifier, enricher, topic, request, config))
        .collect();

    let results: Vec<Result<TrendingTopic>> = stream::iter(futures)
        .buffer_unordered(config.sentiment_concurrency)
        .collect()
        .await;

    results.into_iter().collect()
}

/// Aggregate one topic. Writes its result slot exactly once.
async fn aggregate_one<S, C>(
    source: &S,
    classifier: &C,
    enricher: Option<&dyn ComponentEnricher>,
    topic: Topic,
    request: &DiscoveryRequest,
    config: &EngineConfig,
) -> Result<TrendingTopic>
where
    S: PostSource,
    C: SentimentClassifier,
{
    let terms = topic.search_terms();
    let posts = source
        .fetch_posts_matching(&terms, request.time_window_hours)
        .await?;

    if posts.is_empty() {
        // Valid outcome, not an error: the topic ships with a zero summary.
        debug!(topic = %topic.canonical_name, "no matching posts on re-fetch");
        return Ok(TrendingTopic {
            topic,
            sentiment: SentimentSummary::default(),
            sample_posts: Vec::new(),
            component_analysis: None,
        });
    }

    let mut summary = SentimentSummary::default();
    let mut classified: Vec<(RawPost, SentimentLabel)> = Vec::new();
    for post in posts {
        match classifier.classify(&post.text()).await {
            Ok(sentiment) => {
                summary.record(sentiment.label);
                classified.push((post, sentiment.label));
            }
            Err(e) => {
                warn!(
                    topic = %topic.canonical_name,
                    post_id = %post.id,
                    error = %e,
                    "skipping post that failed classification"
                );
            }
        }
    }

    let sample_posts = select_samples(&classified, config.sample_size);

    let component_analysis = if request.analyze_components {
        analyze_components(enricher, &topic, &sample_posts, config).await
    } else {
        None
    };

    debug!(
        topic = %topic.canonical_name,
        classified = summary.total(),
        samples = sample_posts.len(),
        enriched = component_analysis.is_some(),
        "topic aggregation complete"
    );

    Ok(TrendingTopic {
        topic,
        sentiment: summary,
        sample_posts,
        component_analysis,
    })
}

/// Pick representative posts: the top-scored post of each sentiment bucket
/// first, then the highest-scored remainder, up to `sample_size`.
fn select_samples(classified: &[(RawPost, SentimentLabel)], sample_size: usize) -> Vec<RawPost> {
    if sample_size == 0 || classified.is_empty() {
        return Vec::new();
    }

    let mut samples: Vec<RawPost> = Vec::new();

    for label in [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ] {
        if let Some((post, _)) = classified
            .iter()
            .filter(|(_, l)| *l == label)
            .max_by_key(|(p, _)| p.score)
        {
            if samples.len() < sample_size && !samples.iter().any(|s| s.id == post.id) {
                samples.push(post.clone());
            }
        }
    }

    if samples.len() < sample_size {
        let mut rest: Vec<&RawPost> = classified
            .iter()
            .map(|(p, _)| p)
            .filter(|p| !samples.iter().any(|s| s.id == p.id))
            .collect();
        rest.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        for post in rest {
            if samples.len() >= sample_size {
                break;
            }
            samples.push(post.clone());
        }
    }

    samples
}

/// Run the enricher under its per-call budget; any failure degrades to
/// `None` for this topic only.
async fn analyze_components(
    enricher: Option<&dyn ComponentEnricher>,
    topic: &Topic,
    sample_posts: &[RawPost],
    config: &EngineConfig,
) -> Option<Vec<ComponentSentiment>> {
    let enricher = enricher?;
    if sample_posts.is_empty() {
        return None;
    }

    let call = enricher.analyze_components(&topic.canonical_name, sample_posts);
    match tokio::time::timeout(config.enricher_timeout, call).await {
        Ok(Ok(components)) => Some(components),
        Ok(Err(e)) => {
            warn!(
                topic = %topic.canonical_name,
                error = %e,
                "component enrichment failed; degrading to null"
            );
            None
        }
        Err(_) => {
            warn!(
                topic = %topic.canonical_name,
                timeout_s = config.enricher_timeout.as_secs(),
                "component enrichment timed out; degrading to null"
            );
            None
        }
    }
}
