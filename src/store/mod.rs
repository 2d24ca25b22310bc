//! Storage abstraction for the ingestion pipeline.
//!
//! [`Store`] covers the source catalog, article upserts, and the
//! health/error side effects, enabling pluggable backends: PostgreSQL for
//! production, in-memory for tests and offline runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{ErrorLogEntry, NewArticle, NewSource, Result, Source};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Sources eligible for the next run (`is_active = TRUE`).
    async fn active_sources(&self) -> Result<Vec<Source>>;

    /// Every configured source, active or not.
    async fn list_sources(&self) -> Result<Vec<Source>>;

    /// Register a new source; returns its generated id.
    async fn insert_source(&self, source: &NewSource) -> Result<Uuid>;

    /// Insert by URL. On conflict only the null enrichment fields
    /// (`translated_title`, `translated_summary`, `image_url`) are filled;
    /// core fields are never overwritten by a re-fetch.
    async fn upsert_article(&self, article: &NewArticle) -> Result<()>;

    /// Success path: reset the failure counter, stamp `last_success_at`,
    /// clear `last_error`.
    async fn record_success(&self, source_id: Uuid) -> Result<()>;

    /// Failure path: increment the failure counter, stamp `last_failed_at`,
    /// store the truncated message.
    async fn record_failure(&self, source_id: Uuid, error: &str) -> Result<()>;

    /// Flip `is_active` off once the failure counter has reached
    /// `threshold`. Returns whether the source was deactivated.
    async fn deactivate_exhausted(&self, source_id: Uuid, threshold: i32) -> Result<bool>;

    /// Append a row to the persistent error log.
    async fn log_error(&self, entry: &ErrorLogEntry) -> Result<()>;
}
