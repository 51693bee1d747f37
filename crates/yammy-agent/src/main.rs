//! yammy-agent CLI: one-shot chat or pantry query against the catalog.
//!
//! Settings from `--config <settings.yaml>` (defaults otherwise), catalog
//! path overridable with `--catalog`. External LLM/embedding services are
//! expected at the configured URLs; `embedding.offline: true` swaps the
//! embedding service for the deterministic hash embedder.
//!
//! Logging: set `RUST_LOG=yammy_agent=info` (or `debug`) for stderr logs.

mod cli;

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use yammy_agent::{
    AnswerWriter, ChatService, EmbeddingClient, IntentClassifier, LlmClient, PantryMapper,
    RecommendService, Settings,
};
use yammy_retrieval::{Catalog, Embedder, HashedEmbedder};
use yammy_session::SeenStore;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "yammy_agent=debug,yammy_retrieval=debug,yammy_session=debug"
        } else {
            "yammy_agent=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(catalog_path) = cli.catalog {
        settings.catalog.path = catalog_path;
    }

    let catalog = Arc::new(
        Catalog::load(&settings.catalog.path).with_context(|| {
            format!(
                "failed to load catalog snapshot {}",
                settings.catalog.path.display()
            )
        })?,
    );

    let embedder: Arc<dyn Embedder> = if settings.embedding.offline {
        Arc::new(HashedEmbedder::new(catalog.dimension()))
    } else {
        Arc::new(EmbeddingClient::new(&settings.embedding))
    };

    let recommender = Arc::new(RecommendService::new(
        Arc::clone(&catalog),
        embedder,
        settings.selection.seed,
    ));
    let sessions = Arc::new(SeenStore::with_ttl_ms(
        settings.session.ttl_secs.saturating_mul(1000),
    ));
    let classifier: Arc<dyn IntentClassifier> = Arc::new(LlmClient::new(&settings.classifier));
    let responder = Arc::new(LlmClient::new(&settings.responder));
    let writer: Arc<dyn AnswerWriter> = responder.clone();
    let mapper: Arc<dyn PantryMapper> = responder;
    let service = ChatService::new(recommender, sessions, classifier, writer, Some(mapper));

    let reply = match cli.command {
        Command::Chat { query, user } => service.chat(&user, &query).await?,
        Command::Fridge { ingredients, user } => service.pantry(&user, &ingredients).await?,
    };

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
