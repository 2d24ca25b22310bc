pub mod fetcher;
pub mod health;
pub mod ingestor;
pub mod normalizer;
pub mod parser;
pub mod store;
pub mod translator;
pub mod types;

pub use fetcher::{FetchFeed, HttpFeedFetcher};
pub use health::HealthTracker;
pub use ingestor::Ingestor;
pub use store::{InMemoryStore, PgStore, Store};
pub use translator::{GoogleTranslator, TranslateText, TranslationGateway};
pub use types::*;
