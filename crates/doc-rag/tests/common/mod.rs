//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use doc_rag::providers::{
    EmbeddingProvider, EventPublisher, LlmProvider, PipelineEvent, TextChunker, TextExtractor,
    VectorRetriever, VectorStoreProvider,
};
use doc_rag::{
    DocumentRetrieval, DocumentRetrievalVector, Embedding, Error, ExtractedContent, InputDocument,
    Message, Response, Result,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Extractor returning the document bytes as text
#[derive(Default)]
pub struct MockExtractor {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl MockExtractor {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, document: &InputDocument) -> Result<ExtractedContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::extraction(&document.filename, "corrupt document"));
        }

        let mut metadata = doc_rag::types::Metadata::new();
        metadata.insert("source".to_string(), json!("mock"));
        Ok(ExtractedContent::new(
            String::from_utf8_lossy(&document.content),
            metadata,
        ))
    }
}

/// Chunker splitting on blank lines, one passage per paragraph
#[derive(Default)]
pub struct ParagraphChunker {
    pub calls: AtomicUsize,
    pub seen: Mutex<Option<ExtractedContent>>,
    pub fail: bool,
}

impl ParagraphChunker {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TextChunker for ParagraphChunker {
    async fn chunk(&self, content: &ExtractedContent) -> Result<Vec<DocumentRetrieval>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap() = Some(content.clone());
        if self.fail {
            return Err(Error::chunking("tokenizer crashed"));
        }

        Ok(content
            .text
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .enumerate()
            .map(|(i, p)| {
                let mut metadata = content.metadata.clone();
                metadata.insert("chunk_index".to_string(), json!(i));
                DocumentRetrieval::new(p.trim()).with_metadata(metadata)
            })
            .collect())
    }
}

/// Deterministic embedder: byte-folded vectors of a fixed dimension
pub struct MockEmbedder {
    pub dimensions: usize,
    pub calls: AtomicUsize,
    /// Texts containing this marker fail to embed
    pub fail_marker: Option<String>,
    pub inputs: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
            fail_marker: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(dimensions: usize, marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::new(dimensions)
        }
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += f32::from(byte) / 255.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());

        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(Error::embedding("model unavailable"));
            }
        }

        Ok(Embedding::new("mock-embedder", self.vector_for(text)).with_provider("mock"))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Embedder counting keyword occurrences, one dimension per keyword
pub struct KeywordEmbedder {
    pub keywords: Vec<&'static str>,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let lower = text.to_lowercase();
        let vector = self
            .keywords
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        Ok(Embedding::new("keyword", vector))
    }

    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// How many of the submitted IDs the mock store confirms
#[derive(Clone, Copy)]
pub enum Confirm {
    All,
    First(usize),
    None,
    /// Confirms every ID twice plus one ID that was never submitted
    Noisy,
}

pub struct MockStore {
    pub confirm: Confirm,
    pub calls: AtomicUsize,
    pub upserted: Mutex<Vec<DocumentRetrievalVector>>,
    pub fail: bool,
}

impl MockStore {
    pub fn new(confirm: Confirm) -> Self {
        Self {
            confirm,
            calls: AtomicUsize::new(0),
            upserted: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Confirm::All)
        }
    }
}

#[async_trait]
impl VectorStoreProvider for MockStore {
    async fn upsert(&self, vectors: Vec<DocumentRetrievalVector>) -> Result<Vec<Uuid>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::vector_store("connection refused"));
        }

        let ids: Vec<Uuid> = vectors.iter().map(|v| v.id()).collect();
        self.upserted.lock().unwrap().extend(vectors);

        Ok(match self.confirm {
            Confirm::All => ids,
            Confirm::First(n) => ids.into_iter().take(n).collect(),
            Confirm::None => Vec::new(),
            Confirm::Noisy => {
                let mut noisy = ids.clone();
                noisy.extend(ids);
                noisy.push(Uuid::new_v4());
                noisy
            }
        })
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.upserted.lock().unwrap().len())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Retriever returning a fixed result list
pub struct MockRetriever {
    pub results: Vec<DocumentRetrieval>,
    pub calls: AtomicUsize,
    pub last_top_k: Mutex<Option<usize>>,
    pub last_vector: Mutex<Vec<f32>>,
    pub fail: bool,
}

impl MockRetriever {
    pub fn new(results: Vec<DocumentRetrieval>) -> Self {
        Self {
            results,
            calls: AtomicUsize::new(0),
            last_top_k: Mutex::new(None),
            last_vector: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl VectorRetriever for MockRetriever {
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<DocumentRetrieval>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_top_k.lock().unwrap() = Some(top_k);
        *self.last_vector.lock().unwrap() = vector.to_vec();
        if self.fail {
            return Err(Error::retrieval("index unavailable"));
        }
        Ok(self.results.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// LLM replying with a fixed answer and capturing the prompt
pub struct MockLlm {
    pub reply: String,
    pub calls: AtomicUsize,
    pub messages: Mutex<Vec<Message>>,
    pub fail: bool,
}

impl MockLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn generate(&self, messages: &[Message]) -> Result<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.messages.lock().unwrap() = messages.to_vec();
        if self.fail {
            return Err(Error::llm("model not loaded"));
        }

        Ok(Response::new(self.reply.clone(), "mock-llm")
            .with_tokens(Some(10), Some(1))
            .with_provider("mock")
            .with_processing_time(5))
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-llm"
    }
}

/// Publisher keeping every event
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<PipelineEvent>>,
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: PipelineEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Publisher that always fails
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: PipelineEvent) -> Result<()> {
        Err(Error::event_bus("broker unreachable"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
