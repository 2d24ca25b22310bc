//! Shared fixtures for the integration tests: a scripted feed fetcher, a
//! scripted translation backend, and builders for sources and feed items.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use news_ingestor::fetcher::FetchFeed;
use news_ingestor::translator::{TranslateText, TranslationError};
use news_ingestor::types::{FeedItem, IngestError, ParsedFeed, Result, Source};

/// Scripted fetch outcome per URL.
pub enum StubResponse {
    Feed(ParsedFeed),
    Timeout,
    Network(String),
    Malformed(String),
}

#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, StubResponse>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, response: StubResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }
}

#[async_trait]
impl FetchFeed for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        match self.responses.get(url) {
            Some(StubResponse::Feed(feed)) => Ok(feed.clone()),
            Some(StubResponse::Timeout) => Err(IngestError::FetchTimeout(15)),
            Some(StubResponse::Network(msg)) => Err(IngestError::FetchNetwork(msg.clone())),
            Some(StubResponse::Malformed(msg)) => Err(IngestError::FeedMalformed(msg.clone())),
            None => Err(IngestError::FetchNetwork(format!("no stub for {url}"))),
        }
    }
}

/// What the scripted translation backend should do on every call.
pub enum TranslatorScript {
    /// Succeed, returning "[target] text".
    Echo,
    /// Reject as an invalid-credentials/quota failure.
    AuthError,
    /// Fail transiently.
    TransientError,
}

/// Counts its calls so tests can assert the circuit stays open.
pub struct ScriptedTranslator {
    script: TranslatorScript,
    calls: AtomicUsize,
}

impl ScriptedTranslator {
    pub fn new(script: TranslatorScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslateText for ScriptedTranslator {
    async fn translate(
        &self,
        text: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            TranslatorScript::Echo => Ok(format!("[{target}] {text}")),
            TranslatorScript::AuthError => {
                Err(TranslationError::Auth("HTTP 403: quota exceeded".to_string()))
            }
            TranslatorScript::TransientError => {
                Err(TranslationError::Transient("HTTP 500".to_string()))
            }
        }
    }
}

pub fn source(url: Option<&str>) -> Source {
    Source {
        id: Uuid::new_v4(),
        rss_url: url.map(|u| u.to_string()),
        city_id: 1,
        country_id: 1,
        language_code: None,
        is_active: true,
        failure_count: 0,
        last_success_at: None,
        last_failed_at: None,
        last_error: None,
    }
}

pub fn item(title: &str, link: &str) -> FeedItem {
    FeedItem {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        summary: Some(format!("{title} summary")),
        ..FeedItem::default()
    }
}

pub fn feed(language: Option<&str>, items: Vec<FeedItem>) -> ParsedFeed {
    ParsedFeed {
        language: language.map(|l| l.to_string()),
        items,
    }
}
