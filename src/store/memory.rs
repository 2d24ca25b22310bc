//! In-memory [`Store`] implementation for tests and offline runs.
//!
//! `HashMap`s behind `std::sync::RwLock`; upsert and health semantics match
//! the PostgreSQL statements field for field.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{ErrorLogEntry, NewArticle, NewSource, Result, Source};

use super::Store;

/// A persisted article row plus its ingestion timestamp.
#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub article: NewArticle,
    pub ingested_at: DateTime<Utc>,
}

/// A persisted error-log row plus its timestamp.
#[derive(Debug, Clone)]
pub struct LoggedError {
    pub entry: ErrorLogEntry,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryStore {
    sources: RwLock<HashMap<Uuid, Source>>,
    articles: RwLock<HashMap<String, StoredArticle>>,
    errors: RwLock<Vec<LoggedError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a source row directly, bypassing registration defaults, so
    /// arbitrary health states can be set up.
    pub fn put_source(&self, source: Source) {
        self.sources.write().unwrap().insert(source.id, source);
    }

    pub fn source(&self, id: Uuid) -> Option<Source> {
        self.sources.read().unwrap().get(&id).cloned()
    }

    pub fn article(&self, url: &str) -> Option<StoredArticle> {
        self.articles.read().unwrap().get(url).cloned()
    }

    pub fn article_count(&self) -> usize {
        self.articles.read().unwrap().len()
    }

    pub fn error_log(&self) -> Vec<LoggedError> {
        self.errors.read().unwrap().clone()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn active_sources(&self) -> Result<Vec<Source>> {
        let mut sources: Vec<Source> = self
            .sources
            .read()
            .unwrap()
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        sources.sort_by_key(|s| s.id);
        Ok(sources)
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        let mut sources: Vec<Source> = self.sources.read().unwrap().values().cloned().collect();
        sources.sort_by_key(|s| s.id);
        Ok(sources)
    }

    async fn insert_source(&self, source: &NewSource) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.sources.write().unwrap().insert(
            id,
            Source {
                id,
                rss_url: Some(source.rss_url.clone()),
                city_id: source.city_id,
                country_id: source.country_id,
                language_code: source.language_code.clone(),
                is_active: true,
                failure_count: 0,
                last_success_at: None,
                last_failed_at: None,
                last_error: None,
            },
        );
        Ok(id)
    }

    async fn upsert_article(&self, article: &NewArticle) -> Result<()> {
        let mut articles = self.articles.write().unwrap();
        match articles.get_mut(&article.url) {
            Some(existing) => {
                let row = &mut existing.article;
                if row.translated_title.is_none() {
                    row.translated_title = article.translated_title.clone();
                }
                if row.translated_summary.is_none() {
                    row.translated_summary = article.translated_summary.clone();
                }
                if row.image_url.is_none() {
                    row.image_url = article.image_url.clone();
                }
            }
            None => {
                articles.insert(
                    article.url.clone(),
                    StoredArticle {
                        article: article.clone(),
                        ingested_at: Utc::now(),
                    },
                );
            }
        }
        Ok(())
    }

    async fn record_success(&self, source_id: Uuid) -> Result<()> {
        if let Some(source) = self.sources.write().unwrap().get_mut(&source_id) {
            source.failure_count = 0;
            source.last_success_at = Some(Utc::now());
            source.last_error = None;
        }
        Ok(())
    }

    async fn record_failure(&self, source_id: Uuid, error: &str) -> Result<()> {
        if let Some(source) = self.sources.write().unwrap().get_mut(&source_id) {
            source.failure_count = source.failure_count.max(0) + 1;
            source.last_failed_at = Some(Utc::now());
            source.last_error = Some(error.to_string());
        }
        Ok(())
    }

    async fn deactivate_exhausted(&self, source_id: Uuid, threshold: i32) -> Result<bool> {
        let mut sources = self.sources.write().unwrap();
        if let Some(source) = sources.get_mut(&source_id) {
            if source.failure_count >= threshold {
                source.is_active = false;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn log_error(&self, entry: &ErrorLogEntry) -> Result<()> {
        self.errors.write().unwrap().push(LoggedError {
            entry: entry.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
