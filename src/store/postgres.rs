use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::types::{ErrorLogEntry, NewArticle, NewSource, Result, Source};

use super::Store;

/// PostgreSQL-backed store over the `news_sources`, `news_articles` and
/// `rss_error_logs` tables.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn active_sources(&self) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(
            r#"
            SELECT id, rss_url, city_id, country_id, language_code, is_active,
                   failure_count, last_success_at, last_failed_at, last_error
            FROM news_sources
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sources)
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(
            r#"
            SELECT id, rss_url, city_id, country_id, language_code, is_active,
                   failure_count, last_success_at, last_failed_at, last_error
            FROM news_sources
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sources)
    }

    async fn insert_source(&self, source: &NewSource) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO news_sources (id, rss_url, city_id, country_id, language_code, is_active, failure_count)
            VALUES ($1, $2, $3, $4, $5, TRUE, 0)
            "#,
        )
        .bind(id)
        .bind(&source.rss_url)
        .bind(source.city_id)
        .bind(source.country_id)
        .bind(&source.language_code)
        .execute(&self.pool)
        .await?;

        info!(source_id = %id, url = %source.rss_url, "registered source");
        Ok(id)
    }

    async fn upsert_article(&self, article: &NewArticle) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO news_articles (
                source_id, city_id, country_id, title, translated_title, url,
                summary, translated_summary, content, language, published_at,
                ingested_at, raw_json, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), $12, $13)
            ON CONFLICT (url)
            DO UPDATE SET
                translated_title   = COALESCE(EXCLUDED.translated_title, news_articles.translated_title),
                translated_summary = COALESCE(EXCLUDED.translated_summary, news_articles.translated_summary),
                image_url          = COALESCE(EXCLUDED.image_url, news_articles.image_url)
            "#,
        )
        .bind(article.source_id)
        .bind(article.city_id)
        .bind(article.country_id)
        .bind(&article.title)
        .bind(&article.translated_title)
        .bind(&article.url)
        .bind(&article.summary)
        .bind(&article.translated_summary)
        .bind(&article.content)
        .bind(&article.language)
        .bind(article.published_at)
        .bind(&article.raw_json)
        .bind(&article.image_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_success(&self, source_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE news_sources
            SET failure_count = 0,
                last_success_at = NOW(),
                last_error = NULL
            WHERE id = $1
            "#,
        )
        .bind(source_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_failure(&self, source_id: Uuid, error: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE news_sources
            SET failure_count = COALESCE(failure_count, 0) + 1,
                last_failed_at = NOW(),
                last_error = $2
            WHERE id = $1
            "#,
        )
        .bind(source_id)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn deactivate_exhausted(&self, source_id: Uuid, threshold: i32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE news_sources
            SET is_active = FALSE
            WHERE id = $1
              AND failure_count >= $2
            "#,
        )
        .bind(source_id)
        .bind(threshold)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn log_error(&self, entry: &ErrorLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rss_error_logs (source_id, rss_url, error_type, error_message, stack_trace)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.source_id)
        .bind(&entry.rss_url)
        .bind(&entry.error_type)
        .bind(&entry.error_message)
        .bind(&entry.stack_trace)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
