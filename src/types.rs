use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured feed endpoint plus its health/activation state.
///
/// The pipeline reads the catalog fields and mutates only `failure_count`,
/// `is_active` and the `last_*` columns; everything else is owned by
/// whoever manages the source catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Source {
    pub id: Uuid,
    pub rss_url: Option<String>,
    pub city_id: i32,
    pub country_id: i32,
    /// Optional BCP-47 override for feeds that misreport their language.
    pub language_code: Option<String>,
    pub is_active: bool,
    pub failure_count: i32,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Catalog entry for a source being registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSource {
    pub rss_url: String,
    pub city_id: i32,
    pub country_id: i32,
    pub language_code: Option<String>,
}

/// Raw item as mapped from feed parsing. Created per fetch, consumed within
/// one orchestration pass; the serialized shape is persisted as `raw_json`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    /// Raw HTML body, kept unstripped for downstream readers.
    pub content: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub enclosure: Option<Enclosure>,
    pub media_content: Vec<MediaRef>,
    pub media_thumbnails: Vec<String>,
}

/// An enclosure attachment with its declared MIME type, if any.
#[derive(Debug, Clone, Serialize)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: Option<String>,
}

/// A media-extension `content` reference.
#[derive(Debug, Clone, Serialize)]
pub struct MediaRef {
    pub url: String,
    pub mime_type: Option<String>,
}

/// The result of fetching and parsing one feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub language: Option<String>,
    pub items: Vec<FeedItem>,
}

/// An article row ready for upsert, keyed on `url`.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub source_id: Uuid,
    pub city_id: i32,
    pub country_id: i32,
    pub title: Option<String>,
    pub translated_title: Option<String>,
    pub url: String,
    pub summary: Option<String>,
    pub translated_summary: Option<String>,
    pub content: Option<String>,
    pub language: String,
    pub published_at: Option<DateTime<Utc>>,
    pub raw_json: String,
    pub image_url: Option<String>,
}

/// An append-only error-log row for postmortem analysis.
#[derive(Debug, Clone)]
pub struct ErrorLogEntry {
    pub source_id: Uuid,
    pub rss_url: Option<String>,
    pub error_type: String,
    pub error_message: String,
    pub stack_trace: String,
}

/// Explicit per-source result consumed by the run loop.
#[derive(Debug)]
pub enum SourceOutcome {
    /// Items were fetched and persisted without error.
    Ingested { stored: usize },
    /// Nothing to do for this source; health state is left untouched.
    Skipped(SkipReason),
    /// Processing failed; routed to the health tracker's failure path.
    Failed(IngestError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source has no configured URL.
    NoUrl,
    /// The feed parsed but carried zero items.
    EmptyFeed,
}

/// Counters reported back to the caller after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sources: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub articles: usize,
}

/// HTTP-level fetch settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            // Browser-compatible UA plus a broad Accept header: .xml/.feed
            // endpoints commonly 403 unidentified clients or mislabel their
            // Content-Type.
            user_agent: "Mozilla/5.0 (compatible; NewsIngestor/1.0)".to_string(),
            accept: "application/rss+xml, application/xml, text/xml, application/atom+xml, */*"
                .to_string(),
            timeout_seconds: 15,
        }
    }
}

/// Pipeline-level settings.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Per-run item cap, in feed order, so one backlog feed cannot starve
    /// the rest of the run.
    pub max_items_per_feed: usize,
    /// Consecutive failures after which a source is deactivated.
    pub failure_threshold: i32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_items_per_feed: 40,
            failure_threshold: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("feed fetch timed out after {0}s")]
    FetchTimeout(u64),

    #[error("network error: {0}")]
    FetchNetwork(String),

    #[error("malformed feed: {0}")]
    FeedMalformed(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IngestError {
    /// Stable tag stored in the `error_type` column of the error log.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::FetchTimeout(_) => "FETCH_TIMEOUT",
            IngestError::FetchNetwork(_) => "FETCH_NETWORK",
            IngestError::FeedMalformed(_) => "FEED_MALFORMED",
            IngestError::Database(_) => "PERSISTENCE",
            IngestError::InvalidUrl(_) => "INVALID_URL",
            IngestError::Serialization(_) => "SERIALIZATION",
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
