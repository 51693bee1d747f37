//! Build the catalog snapshot artifact from a raw recipe dump.
//!
//! Reads a JSON array of recipes (no vectors), embeds each recipe's
//! name + ingredient + spicy ingredient + method text, and writes the
//! snapshot the pipeline loads at startup.

#![allow(missing_docs)]

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;

use yammy_agent::{EmbeddingClient, Settings};
use yammy_retrieval::{CatalogEntry, HashedEmbedder};
use yammy_types::Recipe;

#[derive(Parser, Debug)]
#[command(about = "Embed a raw recipe dump into the catalog snapshot artifact")]
struct Args {
    /// Raw recipe dump (JSON array, no vectors).
    #[arg(long)]
    recipes: PathBuf,
    /// Output snapshot path.
    #[arg(long, default_value = "data/catalog.json")]
    out: PathBuf,
    /// Settings file for the embedding service.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Use the deterministic hash embedder with this dimension instead of
    /// the embedding service.
    #[arg(long)]
    offline_dimension: Option<usize>,
}

fn embedding_text(recipe: &Recipe) -> String {
    [
        recipe.name.as_str(),
        recipe.ingredient.as_str(),
        recipe.spicy_ingredient.as_deref().unwrap_or(""),
        recipe.method.as_deref().unwrap_or(""),
    ]
    .join(" ")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let raw = std::fs::read_to_string(&args.recipes)
        .with_context(|| format!("failed to read recipe dump {}", args.recipes.display()))?;
    let recipes: Vec<Recipe> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse recipe dump {}", args.recipes.display()))?;
    println!("레시피 개수: {}", recipes.len());

    let texts: Vec<String> = recipes.iter().map(embedding_text).collect();
    let vectors: Vec<Vec<f32>> = match args.offline_dimension {
        Some(dimension) => {
            let embedder = HashedEmbedder::new(dimension);
            texts.iter().map(|t| embedder.encode(t)).collect()
        }
        None => {
            let settings = Settings::load(args.config.as_deref())?;
            let client = EmbeddingClient::new(&settings.embedding);
            client
                .embed_batch(&texts)
                .await
                .context("embedding service failed while building the snapshot")?
        }
    };
    anyhow::ensure!(
        vectors.len() == recipes.len(),
        "embedding count {} does not match recipe count {}",
        vectors.len(),
        recipes.len()
    );

    let entries: Vec<CatalogEntry> = recipes
        .into_iter()
        .zip(vectors)
        .map(|(recipe, vector)| CatalogEntry { recipe, vector })
        .collect();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, serde_json::to_string_pretty(&entries)?)
        .with_context(|| format!("failed to write snapshot {}", args.out.display()))?;
    println!("레시피 임베딩 생성 완료: {}", args.out.display());
    Ok(())
}
