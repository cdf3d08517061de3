//! `insight`: bootstrap a corpus and query it from the command line.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use insight_rag::{
    DirectorySource, DocumentCorpus, EmbeddingProvider, ErrorResponse, HashingEmbeddingProvider,
    RagError, RetrievalConfig, RetrievalService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, EmbedderKind};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<RagError>() {
                Some(rag) => match serde_json::to_string(&ErrorResponse::from(rag)) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("error: {rag}"),
                },
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let source = DirectorySource::new(&cli.data_dir);

    match &cli.command {
        Command::Seed => {
            let seeded = DocumentCorpus::bootstrap_defaults(&source)?;
            let count = if seeded { insight_rag::seed_documents().len() } else { 0 };
            println!("{}", serde_json::json!({ "seeded": count, "data_dir": cli.data_dir }));
        }
        Command::Search { query } => {
            let service = build_service(&cli, &source).await?;
            let result = service.retrieve(query).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        #[cfg(feature = "openai")]
        Command::Ask { query } => {
            let service = Arc::new(build_service(&cli, &source).await?);
            let generator = Arc::new(insight_rag::OpenAIAnswerGenerator::from_env()?);
            let engine = insight_rag::InsightEngine::new(service, generator);
            let answer = engine.ask(query).await?;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
    }
    Ok(())
}

/// Bootstrap, load, and embed the corpus once.
async fn build_service(cli: &Cli, source: &DirectorySource) -> Result<RetrievalService> {
    if DocumentCorpus::bootstrap_defaults(source)? {
        info!(data_dir = %cli.data_dir.display(), "bootstrapped seed documents");
    }
    let corpus = DocumentCorpus::load(source)?;

    let config = RetrievalConfig::builder()
        .top_k(cli.top_k)
        .embedding_timeout(Duration::from_millis(cli.embedding_timeout_ms))
        .build()?;

    let service = RetrievalService::build(corpus, embedder(cli)?, config).await?;
    Ok(service)
}

const DEFAULT_HASHING_DIMENSIONS: usize = 384;

fn embedder(cli: &Cli) -> Result<Arc<dyn EmbeddingProvider>> {
    match cli.embedder {
        EmbedderKind::Hashing => {
            let dimensions = cli.dimensions.unwrap_or(DEFAULT_HASHING_DIMENSIONS);
            Ok(Arc::new(HashingEmbeddingProvider::new(dimensions)?))
        }
        #[cfg(feature = "openai")]
        EmbedderKind::Openai => {
            let mut provider = insight_rag::OpenAIEmbeddingProvider::from_env()?;
            if let Some(dimensions) = cli.dimensions {
                provider = provider.with_dimensions(dimensions);
            }
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "openai"))]
        EmbedderKind::Openai => {
            anyhow::bail!("the openai embedder requires building with `--features openai`")
        }
    }
}
