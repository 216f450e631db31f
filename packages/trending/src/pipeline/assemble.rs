//! Response assembly - the last pipeline stage.
//!
//! Pure packaging: re-sort aggregated topics by rank (aggregation finishes
//! in completion order, never trust it) and wrap them with batch metadata.

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::types::config::DiscoveryRequest;
use crate::types::report::{TrendingReport, TrendingTopic};

/// Build the final report from aggregated topics.
pub fn build_report(
    mut topics: Vec<TrendingTopic>,
    total_topics_found: usize,
    request: &DiscoveryRequest,
    analysis_time: Duration,
) -> TrendingReport {
    topics.sort_by_key(|t| t.topic.rank);

    TrendingReport {
        batch_id: Uuid::new_v4(),
        topics,
        total_topics_found,
        analysis_time_ms: analysis_time.as_millis() as u64,
        time_window_hours: request.time_window_hours,
        category: request.category.clone(),
        generated_at: Utc::now(),
    }
}
