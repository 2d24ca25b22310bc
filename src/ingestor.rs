use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fetcher::FetchFeed;
use crate::health::HealthTracker;
use crate::normalizer;
use crate::store::Store;
use crate::translator::TranslationGateway;
use crate::types::{
    FeedItem, IngestConfig, NewArticle, ParsedFeed, Result, RunSummary, SkipReason, Source,
    SourceOutcome,
};

/// Drives one ingestion pass: fetch → normalize → translate → persist →
/// health update, per active source. Failures are caught at the source
/// boundary, so one bad feed never aborts the run.
pub struct Ingestor {
    store: Arc<dyn Store>,
    fetcher: Arc<dyn FetchFeed>,
    translator: Arc<TranslationGateway>,
    health: HealthTracker,
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn Store>,
        fetcher: Arc<dyn FetchFeed>,
        translator: Arc<TranslationGateway>,
        config: IngestConfig,
    ) -> Self {
        let health = HealthTracker::new(store.clone(), config.failure_threshold);
        Self {
            store,
            fetcher,
            translator,
            health,
            config,
        }
    }

    /// One idempotent pass over all active sources. Trigger-agnostic: the
    /// caller decides the cadence, and a killed run simply starts over.
    pub async fn run_once(&self) -> Result<RunSummary> {
        let sources = self.store.active_sources().await?;
        info!(sources = sources.len(), "starting ingestion run");

        let mut summary = RunSummary {
            sources: sources.len(),
            ..RunSummary::default()
        };

        for source in &sources {
            match self.process_source(source).await {
                SourceOutcome::Ingested { stored } => {
                    debug!(source_id = %source.id, stored, "source ingested");
                    summary.succeeded += 1;
                    summary.articles += stored;
                    self.health.record_success(source).await;
                }
                SourceOutcome::Skipped(reason) => {
                    debug!(source_id = %source.id, ?reason, "source skipped");
                    summary.skipped += 1;
                }
                SourceOutcome::Failed(err) => {
                    warn!(source_id = %source.id, error = %err, "source failed");
                    summary.failed += 1;
                    self.health.record_failure(source, &err).await;
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            articles = summary.articles,
            "ingestion run complete"
        );
        Ok(summary)
    }

    async fn process_source(&self, source: &Source) -> SourceOutcome {
        let Some(url) = source.rss_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return SourceOutcome::Skipped(SkipReason::NoUrl);
        };

        let feed = match self.fetcher.fetch(url).await {
            Ok(feed) => feed,
            Err(err) => return SourceOutcome::Failed(err),
        };

        // Some endpoints return valid XML with an empty channel; that is not
        // a failure, and not a success either.
        if feed.items.is_empty() {
            return SourceOutcome::Skipped(SkipReason::EmptyFeed);
        }

        let language = effective_language(source, &feed);
        let translate = self.translator.needs_translation(&language);

        let mut stored = 0;
        for item in feed.items.iter().take(self.config.max_items_per_feed) {
            match self.ingest_item(source, item, &language, translate).await {
                Ok(true) => stored += 1,
                Ok(false) => {}
                Err(err) => return SourceOutcome::Failed(err),
            }
        }
        SourceOutcome::Ingested { stored }
    }

    /// Returns whether an article row was written for this item.
    async fn ingest_item(
        &self,
        source: &Source,
        item: &FeedItem,
        language: &str,
        translate: bool,
    ) -> Result<bool> {
        let Some(url) = item.link.as_deref().filter(|u| !u.trim().is_empty()) else {
            // No link means no dedup key.
            debug!(source_id = %source.id, "dropping item without a link");
            return Ok(false);
        };

        let title = normalizer::clean_text(item.title.as_deref());
        let summary = normalizer::clean_text(item.summary.as_deref().or(item.content.as_deref()));
        let image_url = normalizer::extract_image(item);

        let (translated_title, translated_summary) = if translate {
            (
                self.translator.translate(title.as_deref()).await,
                self.translator.translate(summary.as_deref()).await,
            )
        } else {
            (None, None)
        };

        let article = NewArticle {
            source_id: source.id,
            city_id: source.city_id,
            country_id: source.country_id,
            title,
            translated_title,
            url: url.to_string(),
            summary,
            translated_summary,
            content: item.content.clone(),
            language: language.to_string(),
            published_at: item.published,
            raw_json: serde_json::to_string(item)?,
            image_url,
        };
        self.store.upsert_article(&article).await?;
        Ok(true)
    }
}

/// Per-source configured language wins over the feed-reported one; feeds
/// that report nothing are "unknown", which never matches the target prefix.
fn effective_language(source: &Source, feed: &ParsedFeed) -> String {
    let configured = source
        .language_code
        .as_deref()
        .filter(|l| !l.trim().is_empty());
    let reported = feed.language.as_deref().filter(|l| !l.trim().is_empty());
    configured.or(reported).unwrap_or("unknown").to_string()
}
