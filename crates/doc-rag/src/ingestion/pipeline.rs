//! Ingestion pipeline: extract, enrich, chunk, embed, store, account

use chrono::Utc;
use futures::future::join_all;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::{EmbeddingFailurePolicy, IngestionConfig};
use crate::error::Result;
use crate::providers::{
    publish_best_effort, EmbeddingProvider, EventPublisher, PipelineEvent, TextChunker,
    TextExtractor, VectorStoreProvider,
};
use crate::types::{
    DocumentRetrieval, DocumentRetrievalVector, ExtractedContent, InputDocument, Metadata,
    StoreDocumentResult, StoreDocumentStatus,
};

/// Add `filename`, `document_type` and `ingested_at` to extracted metadata
///
/// Returns a new value; `content` is not modified.
pub fn enrich_metadata(content: &ExtractedContent, document: &InputDocument) -> ExtractedContent {
    let mut extra = Metadata::new();
    extra.insert("filename".to_string(), json!(document.filename));
    extra.insert("document_type".to_string(), json!(document.document_type.as_str()));
    extra.insert("ingested_at".to_string(), json!(Utc::now().to_rfc3339()));
    content.with_metadata(extra)
}

/// Embedded chunks plus the number that failed under [`EmbeddingFailurePolicy::Record`]
struct EmbeddedChunks {
    vectors: Vec<DocumentRetrievalVector>,
    failures: usize,
}

/// Turns one document into stored vector passages
pub struct IngestionPipeline {
    extractor: Arc<dyn TextExtractor>,
    chunker: Arc<dyn TextChunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    events: Option<Arc<dyn EventPublisher>>,
    config: IngestionConfig,
}

impl IngestionPipeline {
    /// Create a pipeline over the given collaborators
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        chunker: Arc<dyn TextChunker>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            extractor,
            chunker,
            embedder,
            store,
            events: None,
            config,
        }
    }

    /// Publish milestone events through `events`
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Ingest one document
    ///
    /// Extraction, chunking and storage failures propagate. Embedding
    /// failures propagate or are counted as failed chunks depending on
    /// [`IngestionConfig::embedding_failure`]. Chunks the store does not
    /// confirm are counted as failed.
    pub async fn ingest(&self, document: InputDocument) -> Result<StoreDocumentResult> {
        let correlation_id = Uuid::new_v4();
        let start = Instant::now();
        let filename = document.filename.clone();

        tracing::info!(
            "[{}] Starting ingestion ({} bytes, {})",
            filename,
            document.size(),
            document.document_type
        );

        publish_best_effort(
            self.events.as_ref(),
            PipelineEvent::DocumentIngestionStarted {
                correlation_id,
                filename: filename.clone(),
                document_type: document.document_type,
                occurred_at: Utc::now(),
            },
        )
        .await;

        let stage = Instant::now();
        let extracted = self.extractor.extract(&document).await.map_err(|e| {
            tracing::error!("[{}] Extraction via {} failed: {}", filename, self.extractor.name(), e);
            e
        })?;
        let extraction_ms = stage.elapsed().as_millis() as u64;

        let enriched = enrich_metadata(&extracted, &document);

        let stage = Instant::now();
        let chunks = self.chunker.chunk(&enriched).await?;
        let chunking_ms = stage.elapsed().as_millis() as u64;
        let total_chunks = chunks.len();

        tracing::info!("[{}] Created {} chunks, generating embeddings...", filename, total_chunks);

        let stage = Instant::now();
        let EmbeddedChunks { vectors, failures } = self.embed_chunks(&filename, chunks).await?;
        let embedding_ms = stage.elapsed().as_millis() as u64;

        let stage = Instant::now();
        let ingested_chunks = self.store_vectors(&filename, vectors).await?;
        let storage_ms = stage.elapsed().as_millis() as u64;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        let metrics: HashMap<String, serde_json::Value> = [
            ("processing_time_ms", json!(processing_time_ms)),
            ("extraction_ms", json!(extraction_ms)),
            ("chunking_ms", json!(chunking_ms)),
            ("embedding_ms", json!(embedding_ms)),
            ("storage_ms", json!(storage_ms)),
            ("embedding_failures", json!(failures)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let result = StoreDocumentResult::from_counts(total_chunks, ingested_chunks).with_metrics(metrics);

        match result.status() {
            StoreDocumentStatus::Success => tracing::info!(
                "[{}] Ingested {} chunks in {}ms",
                filename,
                result.ingested_chunks(),
                processing_time_ms
            ),
            status => tracing::warn!(
                "[{}] Ingestion finished with status {}: {}/{} chunks stored",
                filename,
                status,
                result.ingested_chunks(),
                result.total_chunks()
            ),
        }

        publish_best_effort(
            self.events.as_ref(),
            PipelineEvent::DocumentIngested {
                correlation_id,
                filename,
                total_chunks: result.total_chunks(),
                ingested_chunks: result.ingested_chunks(),
                failed_chunks: result.failed_chunks(),
                status: result.status(),
                elapsed_ms: processing_time_ms,
                occurred_at: Utc::now(),
            },
        )
        .await;

        Ok(result)
    }

    /// Embed chunks in concurrent batches, keeping chunk order
    async fn embed_chunks(&self, filename: &str, chunks: Vec<DocumentRetrieval>) -> Result<EmbeddedChunks> {
        let batch_size = self.config.parallel_embeddings();
        let policy = self.config.embedding_failure;

        let mut vectors = Vec::with_capacity(chunks.len());
        let mut failures = 0usize;
        let mut index = 0usize;
        let mut remaining = chunks.into_iter();

        loop {
            let batch: Vec<DocumentRetrieval> = remaining.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let results = join_all(batch.iter().map(|chunk| self.embedder.embed(&chunk.content))).await;

            for (chunk, result) in batch.into_iter().zip(results) {
                match result {
                    Ok(embedding) => vectors.push(DocumentRetrievalVector::new(chunk, embedding.vector)),
                    Err(e) => match policy {
                        EmbeddingFailurePolicy::Abort => {
                            tracing::error!(
                                "[{}] Embedding chunk {} via {} failed, aborting: {}",
                                filename,
                                index,
                                self.embedder.name(),
                                e
                            );
                            return Err(e);
                        }
                        EmbeddingFailurePolicy::Record => {
                            tracing::warn!("[{}] Embedding chunk {} failed: {}", filename, index, e);
                            failures += 1;
                        }
                    },
                }
                index += 1;
            }
        }

        Ok(EmbeddedChunks { vectors, failures })
    }

    /// Upsert vectors and count the submitted IDs the store confirmed
    async fn store_vectors(&self, filename: &str, vectors: Vec<DocumentRetrievalVector>) -> Result<usize> {
        if vectors.is_empty() {
            tracing::debug!("[{}] Nothing to store", filename);
            return Ok(0);
        }

        let submitted: HashSet<Uuid> = vectors.iter().map(DocumentRetrievalVector::id).collect();
        let count = vectors.len();

        let confirmed = self.store.upsert(vectors).await.map_err(|e| {
            tracing::error!("[{}] Upsert into {} failed: {}", filename, self.store.name(), e);
            e
        })?;

        let ingested = confirmed
            .into_iter()
            .filter(|id| submitted.contains(id))
            .collect::<HashSet<_>>()
            .len();

        tracing::debug!("[{}] Store confirmed {}/{} vectors", filename, ingested, count);
        Ok(ingested)
    }
}
