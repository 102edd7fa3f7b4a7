//! Integration tests for the ingestion pipeline.
//!
//! Tests the flow: extract → enrich → chunk → embed → store → account.

mod common;

use common::{
    Confirm, FailingPublisher, MockEmbedder, MockExtractor, MockStore, ParagraphChunker,
    RecordingPublisher,
};
use doc_rag::config::IngestionConfig;
use doc_rag::providers::PipelineEvent;
use doc_rag::{
    DocumentType, EmbeddingFailurePolicy, Error, IngestionPipeline, InputDocument, StoreDocumentStatus,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

const THREE_PARAGRAPHS: &str = "First paragraph about Rust.\n\nSecond paragraph about tokio.\n\nThird paragraph about serde.";

fn document(text: &str) -> InputDocument {
    InputDocument::new("notes.txt", text.as_bytes().to_vec(), DocumentType::Txt)
}

struct Fixture {
    extractor: Arc<MockExtractor>,
    chunker: Arc<ParagraphChunker>,
    embedder: Arc<MockEmbedder>,
    store: Arc<MockStore>,
}

impl Fixture {
    fn new(embedder: MockEmbedder, store: MockStore) -> Self {
        Self {
            extractor: Arc::new(MockExtractor::default()),
            chunker: Arc::new(ParagraphChunker::default()),
            embedder: Arc::new(embedder),
            store: Arc::new(store),
        }
    }

    fn pipeline(&self, config: IngestionConfig) -> IngestionPipeline {
        IngestionPipeline::new(
            self.extractor.clone(),
            self.chunker.clone(),
            self.embedder.clone(),
            self.store.clone(),
            config,
        )
    }
}

fn config(parallel: usize, policy: EmbeddingFailurePolicy) -> IngestionConfig {
    IngestionConfig {
        parallel_embeddings: Some(parallel),
        embedding_failure: policy,
    }
}

#[tokio::test]
async fn test_three_chunks_all_stored() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.total_chunks(), 3);
    assert_eq!(result.ingested_chunks(), 3);
    assert_eq!(result.failed_chunks(), 0);
    assert_eq!(result.status(), StoreDocumentStatus::Success);

    let upserted = fixture.store.upserted.lock().unwrap();
    assert_eq!(upserted.len(), 3);
    assert!(upserted.iter().all(|v| v.dimensions() == 5));
    assert_ne!(upserted[0].vector, upserted[1].vector);
    assert_ne!(upserted[1].vector, upserted[2].vector);
    assert_eq!(fixture.store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_vectors_keep_chunk_order_and_identity() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All));

    fixture
        .pipeline(config(2, EmbeddingFailurePolicy::Abort))
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    let upserted = fixture.store.upserted.lock().unwrap();
    let contents: Vec<_> = upserted.iter().map(|v| v.document.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "First paragraph about Rust.",
            "Second paragraph about tokio.",
            "Third paragraph about serde."
        ]
    );
    for vector in upserted.iter() {
        assert_eq!(vector.vector, fixture.embedder.vector_for(&vector.document.content));
    }
}

#[tokio::test]
async fn test_metadata_is_enriched_before_chunking() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All));

    fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    let seen = fixture.chunker.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.metadata["filename"], "notes.txt");
    assert_eq!(seen.metadata["document_type"], "txt");
    assert_eq!(seen.metadata["source"], "mock");
    assert!(seen.metadata["ingested_at"].is_string());

    let upserted = fixture.store.upserted.lock().unwrap();
    assert!(upserted.iter().all(|v| v.document.metadata["filename"] == "notes.txt"));
}

#[tokio::test]
async fn test_store_confirming_subset_is_partial() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::First(2)));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.status(), StoreDocumentStatus::Partial);
    assert_eq!(result.ingested_chunks(), 2);
    assert_eq!(result.failed_chunks(), 1);
    assert_eq!(result.ingested_chunks() + result.failed_chunks(), result.total_chunks());
}

#[tokio::test]
async fn test_store_confirming_nothing_is_error() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::None));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.status(), StoreDocumentStatus::Error);
    assert_eq!(result.ingested_chunks(), 0);
    assert_eq!(result.failed_chunks(), 3);
}

#[tokio::test]
async fn test_unknown_and_duplicate_ids_are_not_counted() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::Noisy));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.ingested_chunks(), 3);
    assert_eq!(result.status(), StoreDocumentStatus::Success);
}

#[tokio::test]
async fn test_extraction_failure_propagates() {
    let fixture = Fixture {
        extractor: Arc::new(MockExtractor::failing()),
        ..Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All))
    };

    let err = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Extraction { .. }));
    assert_eq!(fixture.chunker.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chunking_failure_propagates() {
    let fixture = Fixture {
        chunker: Arc::new(ParagraphChunker::failing()),
        ..Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All))
    };

    let err = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Chunking(_)));
    assert_eq!(fixture.extractor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_embedding_failure_aborts_by_default() {
    let fixture = Fixture::new(
        MockEmbedder::failing_on(5, "Second"),
        MockStore::new(Confirm::All),
    );

    let err = fixture
        .pipeline(config(1, EmbeddingFailurePolicy::Abort))
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Embedding(_)));
    // Sequential batches: the third chunk is never embedded
    assert_eq!(fixture.embedder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fixture.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_embedding_failure_recorded_as_failed_chunk() {
    let fixture = Fixture::new(
        MockEmbedder::failing_on(5, "Second"),
        MockStore::new(Confirm::All),
    );

    let result = fixture
        .pipeline(config(4, EmbeddingFailurePolicy::Record))
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.total_chunks(), 3);
    assert_eq!(result.ingested_chunks(), 2);
    assert_eq!(result.failed_chunks(), 1);
    assert_eq!(result.status(), StoreDocumentStatus::Partial);
    assert_eq!(result.metrics().unwrap()["embedding_failures"], 1);

    let upserted = fixture.store.upserted.lock().unwrap();
    assert_eq!(upserted.len(), 2);
    assert!(upserted.iter().all(|v| !v.document.content.contains("Second")));
}

#[tokio::test]
async fn test_all_embeddings_failing_skips_store() {
    let fixture = Fixture::new(
        MockEmbedder::failing_on(5, "paragraph"),
        MockStore::new(Confirm::All),
    );

    let result = fixture
        .pipeline(config(2, EmbeddingFailurePolicy::Record))
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.status(), StoreDocumentStatus::Error);
    assert_eq!(result.failed_chunks(), 3);
    assert_eq!(fixture.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_chunks_is_success_without_store_call() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document("\n\n   \n\n"))
        .await
        .unwrap();

    assert_eq!(result.total_chunks(), 0);
    assert_eq!(result.status(), StoreDocumentStatus::Success);
    assert_eq!(fixture.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::failing());

    let err = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::VectorStore(_)));
}

#[tokio::test]
async fn test_metrics_are_reported() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    let metrics = result.metrics().unwrap();
    for key in [
        "processing_time_ms",
        "extraction_ms",
        "chunking_ms",
        "embedding_ms",
        "storage_ms",
        "embedding_failures",
    ] {
        assert!(metrics.contains_key(key), "missing metric {}", key);
    }
}

#[tokio::test]
async fn test_events_share_correlation_id() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::First(1)));
    let publisher = Arc::new(RecordingPublisher::default());

    fixture
        .pipeline(IngestionConfig::default())
        .with_events(publisher.clone())
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    let events = publisher.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], PipelineEvent::DocumentIngestionStarted { .. }));
    match &events[1] {
        PipelineEvent::DocumentIngested {
            total_chunks,
            ingested_chunks,
            failed_chunks,
            status,
            ..
        } => {
            assert_eq!((*total_chunks, *ingested_chunks, *failed_chunks), (3, 1, 2));
            assert_eq!(*status, StoreDocumentStatus::Partial);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(events[0].correlation_id(), events[1].correlation_id());
}

#[tokio::test]
async fn test_failing_event_bus_does_not_fail_ingestion() {
    let fixture = Fixture::new(MockEmbedder::new(5), MockStore::new(Confirm::All));

    let result = fixture
        .pipeline(IngestionConfig::default())
        .with_events(Arc::new(FailingPublisher))
        .ingest(document(THREE_PARAGRAPHS))
        .await
        .unwrap();

    assert_eq!(result.status(), StoreDocumentStatus::Success);
}
