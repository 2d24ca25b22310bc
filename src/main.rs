use std::env;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use news_ingestor::fetcher::HttpFeedFetcher;
use news_ingestor::store::{PgStore, Store};
use news_ingestor::translator::{GoogleTranslator, TranslationGateway};
use news_ingestor::types::{FetchConfig, IngestConfig, NewSource};
use news_ingestor::Ingestor;

#[derive(Parser)]
#[command(name = "news-ingestor", about = "RSS/Atom news ingestion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a single ingestion pass over all active sources and exit.
    Run,
    /// Register a new feed source.
    AddSource {
        #[arg(long)]
        url: String,
        #[arg(long)]
        city_id: i32,
        #[arg(long)]
        country_id: i32,
        /// Optional BCP-47 override for feeds that misreport their language.
        #[arg(long)]
        language: Option<String>,
    },
    /// List configured sources with their health state.
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let store = Arc::new(PgStore::connect(&database_url).await?);

    match cli.command {
        Command::Run => run(store).await,
        Command::AddSource {
            url,
            city_id,
            country_id,
            language,
        } => {
            url::Url::parse(&url).context("invalid feed URL")?;
            let id = store
                .insert_source(&NewSource {
                    rss_url: url,
                    city_id,
                    country_id,
                    language_code: language,
                })
                .await?;
            println!("registered source {id}");
            Ok(())
        }
        Command::Sources => {
            for source in store.list_sources().await? {
                println!(
                    "{}  active={}  failures={}  url={}  last_error={}",
                    source.id,
                    source.is_active,
                    source.failure_count,
                    source.rss_url.as_deref().unwrap_or("-"),
                    source.last_error.as_deref().unwrap_or("-"),
                );
            }
            Ok(())
        }
    }
}

async fn run(store: Arc<PgStore>) -> anyhow::Result<()> {
    let target = env::var("TARGET_LANGUAGE").unwrap_or_else(|_| "en".to_string());
    let api_key = env::var("GOOGLE_TRANSLATE_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    // Log key presence, never the key.
    info!(
        translate_key_present = api_key.is_some(),
        target_language = %target,
        "translation config"
    );

    let translator = match api_key {
        Some(key) => TranslationGateway::new(Arc::new(GoogleTranslator::new(key)), &target),
        None => TranslationGateway::without_backend(&target),
    };

    let ingestor = Ingestor::new(
        store,
        Arc::new(HttpFeedFetcher::new(&FetchConfig::default())),
        Arc::new(translator),
        IngestConfig::default(),
    );

    let summary = ingestor.run_once().await?;
    info!(
        sources = summary.sources,
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        articles = summary.articles,
        "run finished"
    );
    Ok(())
}
