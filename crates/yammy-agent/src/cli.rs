use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "yammy-agent")]
#[command(about = "Yammy recipe recommender: one-shot chat or pantry matching over the catalog.")]
pub(crate) struct Cli {
    /// Path to settings.yaml (built-in defaults when omitted).
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Override the catalog snapshot path from settings.
    #[arg(long, global = true)]
    pub(crate) catalog: Option<PathBuf>,

    /// Verbose logs (debug-level tracing on stderr).
    #[arg(long, short = 'v', global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run one chat turn and print the reply as JSON.
    Chat {
        /// User utterance.
        #[arg(long)]
        query: String,

        /// User id for seen-history tracking (default: cli)
        #[arg(long, default_value = "cli")]
        user: String,
    },
    /// Run the pantry flow over explicit ingredients and print the reply.
    Fridge {
        /// Pantry ingredient (repeatable).
        #[arg(long = "ingredient", required = true)]
        ingredients: Vec<String>,

        /// User id for seen-history tracking (default: cli)
        #[arg(long, default_value = "cli")]
        user: String,
    },
}
