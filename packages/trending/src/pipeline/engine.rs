//! The trending engine - main entry point for the library.
//!
//! One linear, stateless pass per request:
//! validate → ingest → extract → normalize → score/truncate →
//! aggregate (parallel) → assemble. No cross-request state: every call is a
//! fresh computation over freshly fetched posts.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Result, TrendingError};
use crate::extract::{self, TitlePattern};
use crate::normalize::normalize_candidates;
use crate::pipeline::{assemble, sentiment};
use crate::scoring::TrendingScorer;
use crate::traits::classifier::SentimentClassifier;
use crate::traits::enricher::ComponentEnricher;
use crate::traits::source::PostSource;
use crate::types::config::{DiscoveryRequest, EngineConfig};
use crate::types::report::TrendingReport;

/// Discovers and ranks trending topics from a stream of recent posts.
///
/// Generic over the ingestion and classification capabilities; the optional
/// component enricher is a trait object since most deployments run without
/// one. Construct once (the classifier is typically the expensive part) and
/// reuse across requests.
///
/// # Example
///
/// ```rust,ignore
/// use trending::{DiscoveryRequest, LexiconClassifier, RedditSource, TrendingEngine};
///
/// let engine = TrendingEngine::new(RedditSource::new(), LexiconClassifier::new());
/// let report = engine
///     .discover(DiscoveryRequest::new("technology").with_top_n(5))
///     .await?;
/// ```
pub struct TrendingEngine<S, C> {
    source: S,
    classifier: C,
    enricher: Option<Box<dyn ComponentEnricher>>,
    patterns: Vec<Box<dyn TitlePattern>>,
    config: EngineConfig,
}

impl<S, C> TrendingEngine<S, C>
where
    S: PostSource,
    C: SentimentClassifier,
{
    /// Create an engine with the default pattern list and configuration.
    pub fn new(source: S, classifier: C) -> Self {
        Self {
            source,
            classifier,
            enricher: None,
            patterns: extract::default_patterns(),
            config: EngineConfig::default(),
        }
    }

    /// Attach a component enricher.
    pub fn with_enricher(mut self, enricher: Box<dyn ComponentEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the title pattern list.
    pub fn with_patterns(mut self, patterns: Vec<Box<dyn TitlePattern>>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Discover trending topics for one request.
    ///
    /// Returns a ranked, possibly partially-enriched report, or one
    /// structured error explaining why no result could be produced. The
    /// whole pass runs under `config.request_timeout`.
    pub async fn discover(&self, request: DiscoveryRequest) -> Result<TrendingReport> {
        request.validate(&self.config)?;

        let started = Instant::now();
        info!(
            category = %request.category,
            window_h = request.time_window_hours,
            top_n = request.top_n,
            "discovery started"
        );

        let report = match tokio::time::timeout(
            self.config.request_timeout,
            self.run_pipeline(&request, started),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(TrendingError::Timeout { stage: "discovery" }),
        };

        info!(
            category = %request.category,
            topics = report.topics.len(),
            total_found = report.total_topics_found,
            elapsed_ms = report.analysis_time_ms,
            "discovery complete"
        );
        Ok(report)
    }

    async fn run_pipeline(
        &self,
        request: &DiscoveryRequest,
        started: Instant,
    ) -> Result<TrendingReport> {
        // 1) ingest
        let fetch_start = Instant::now();
        let posts = self
            .source
            .fetch_posts(&request.category, request.time_window_hours)
            .await?;
        debug!(
            posts = posts.len(),
            elapsed_ms = fetch_start.elapsed().as_millis() as u64,
            "ingestion complete"
        );
        if posts.is_empty() {
            return Err(TrendingError::NoData {
                category: request.category.clone(),
                time_window_hours: request.time_window_hours,
            });
        }

        // 2) extract + 3) normalize — pure, synchronous stages
        let candidates = extract::extract_candidates(&posts, &self.patterns);
        let clusters = normalize_candidates(
            &candidates,
            self.config.merge_overlap_threshold,
            request.min_posts,
        );
        if clusters.is_empty() {
            return Err(TrendingError::NoTopics {
                category: request.category.clone(),
                min_posts: request.min_posts,
            });
        }

        // 4) score, rank, truncate
        let scorer = TrendingScorer::new(self.config.weights);
        let mut ranked = scorer.score_topics(clusters, Utc::now());
        let total_topics_found = ranked.len();
        ranked.truncate(request.top_n);
        debug!(
            total_found = total_topics_found,
            selected = ranked.len(),
            "scoring complete"
        );

        // 5) aggregate sentiment (bounded parallel)
        let aggregated = sentiment::aggregate_topics(
            &self.source,
            &self.classifier,
            self.enricher.as_deref(),
            ranked,
            request,
            &self.config,
        )
        .await?;

        // 6) assemble
        Ok(assemble::build_report(
            aggregated,
            total_topics_found,
            request,
            started.elapsed(),
        ))
    }
}
