use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Errors from the remote translation backend. `Auth` marks the class of
/// failure that opens the circuit; everything else is per-call only.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation credentials or quota rejected: {0}")]
    Auth(String),

    #[error("translation backend error: {0}")]
    Transient(String),
}

/// A remote translation call. `target` is a lowercase BCP-47 code.
#[async_trait]
pub trait TranslateText: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError>;
}

pub const GOOGLE_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Translate v2 backend: JSON POST with the API key as a query
/// parameter.
pub struct GoogleTranslator {
    client: Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl GoogleTranslator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: GOOGLE_TRANSLATE_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TranslateText for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&TranslateRequest {
                q: text,
                target,
                format: "text",
            })
            .send()
            .await
            .map_err(|e| TranslationError::Transient(e.to_string()))?;

        let status = response.status();
        // 400 covers an invalid key, 403 quota/permission denial.
        if status == StatusCode::BAD_REQUEST || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Auth(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Transient(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Transient(e.to_string()))?;

        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| TranslationError::Transient("empty translations array".to_string()))
    }
}

/// Wraps the translation backend behind a process-wide circuit breaker.
///
/// An authentication or quota failure opens the circuit for the remainder
/// of the process: a bad key must not block ingestion of untranslated
/// content, and must not be retried across thousands of items per run. The
/// flag only resets with a process restart.
pub struct TranslationGateway {
    backend: Option<Arc<dyn TranslateText>>,
    disabled: AtomicBool,
    target: String,
}

impl TranslationGateway {
    pub fn new(backend: Arc<dyn TranslateText>, target_language: &str) -> Self {
        Self {
            backend: Some(backend),
            disabled: AtomicBool::new(false),
            target: target_language.to_lowercase(),
        }
    }

    /// Gateway with no configured backend; every call returns `None`.
    pub fn without_backend(target_language: &str) -> Self {
        Self {
            backend: None,
            disabled: AtomicBool::new(true),
            target: target_language.to_lowercase(),
        }
    }

    pub fn target_language(&self) -> &str {
        &self.target
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// A feed whose language already starts with the target code's prefix
    /// is not translated ("EN-US" and "en" both match "en").
    pub fn needs_translation(&self, language: &str) -> bool {
        !language.to_lowercase().starts_with(&self.target)
    }

    /// Translate into the target language, degrading to `None` on empty
    /// input, an open circuit, or any backend failure.
    pub async fn translate(&self, text: Option<&str>) -> Option<String> {
        let text = text?.trim();
        if text.is_empty() || self.is_disabled() {
            return None;
        }
        let backend = self.backend.as_ref()?;

        match backend.translate(text, &self.target).await {
            Ok(translated) => Some(translated),
            Err(TranslationError::Auth(msg)) => {
                warn!(
                    error = %msg,
                    "translation backend rejected credentials, disabling translations for this process"
                );
                self.disabled.store(true, Ordering::SeqCst);
                None
            }
            Err(TranslationError::Transient(msg)) => {
                warn!(error = %msg, "translation call failed");
                None
            }
        }
    }
}
