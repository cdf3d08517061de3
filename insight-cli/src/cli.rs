//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "insight", version, about = "Answer questions from a document corpus")]
pub struct Cli {
    /// Directory holding one JSON file per document.
    #[arg(long, env = "INSIGHT_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Embedding backend.
    #[arg(long, value_enum, default_value_t = EmbedderKind::Hashing, global = true)]
    pub embedder: EmbedderKind,

    /// Vector dimension. Defaults to 384 for hashing and to the model's
    /// native size for OpenAI.
    #[arg(long, global = true)]
    pub dimensions: Option<usize>,

    /// Number of documents to retrieve.
    #[arg(long, env = "INSIGHT_TOP_K", default_value_t = 3, global = true)]
    pub top_k: usize,

    /// Embedding timeout in milliseconds.
    #[arg(long, default_value_t = 30_000, global = true)]
    pub embedding_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
    /// Offline feature hashing, no API key.
    Hashing,
    /// OpenAI embeddings API (needs the `openai` feature and `OPENAI_API_KEY`).
    Openai,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the seed documents into an empty data directory.
    Seed,
    /// Retrieve the documents nearest to a query.
    Search {
        query: String,
    },
    /// Retrieve documents and generate a cited answer.
    #[cfg(feature = "openai")]
    Ask {
        query: String,
    },
}
