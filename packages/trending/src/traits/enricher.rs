//! Component enricher trait.

use async_trait::async_trait;

use crate::error::EnricherResult;
use crate::types::post::RawPost;
use crate::types::sentiment::ComponentSentiment;

/// Breaks a topic's sentiment down by sub-aspect ("component").
///
/// This capability is optional and failure-isolated: the aggregator catches
/// errors and timeouts per topic and degrades that topic's
/// `component_analysis` to `None` without failing the request.
#[async_trait]
pub trait ComponentEnricher: Send + Sync {
    /// Analyze the sampled posts of one topic.
    async fn analyze_components(
        &self,
        topic_name: &str,
        sample_posts: &[RawPost],
    ) -> EnricherResult<Vec<ComponentSentiment>>;

    /// Enricher name for logging/debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}
