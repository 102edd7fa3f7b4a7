//! Ingest files and ask a question against them
//!
//! Run with: cargo run -p doc-rag --features cli -- --file notes.pdf "What is covered?"

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_rag::ingestion::chunker_from_config;
use doc_rag::providers::{
    ollama_providers, BroadcastEventBus, EventPublisher, LlmProvider, LocalExtractor,
};
use doc_rag::retrieval::InMemoryVectorStore;
use doc_rag::{IngestionPipeline, InputDocument, Query, QueryPipeline, RagConfig};

#[derive(Parser)]
#[command(name = "doc-rag")]
#[command(about = "Ingest documents and answer questions with retrieval-augmented generation")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: $RAG_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documents to ingest (pdf, docx, txt)
    #[arg(short, long = "file", required = true)]
    files: Vec<PathBuf>,

    /// Question to answer once ingestion is done
    question: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = RagConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config.validate()?;
            config
        }
        None => RagConfig::load().context("Failed to load config")?,
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);

    let (embedder, llm) = ollama_providers(&config.llm, config.embeddings.dimensions)?;
    if !llm.health_check().await? {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
    }

    let store = Arc::new(InMemoryVectorStore::new(config.embeddings.dimensions));
    let events: Arc<dyn EventPublisher> = Arc::new(BroadcastEventBus::default());

    let ingestion = IngestionPipeline::new(
        Arc::new(LocalExtractor::new()),
        chunker_from_config(&config.chunking),
        embedder.clone(),
        store.clone(),
        config.ingestion.clone(),
    )
    .with_events(events.clone());

    for path in &cli.files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let content = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let document = InputDocument::from_filename(filename, content)?;

        let result = ingestion.ingest(document).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    if let Some(question) = cli.question {
        let pipeline = QueryPipeline::new(embedder, store, llm, config.query.clone()).with_events(events);
        let response = pipeline.process(&Query::new(question)).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}
