//! Vector store traits for storing and searching embeddings

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{DocumentRetrieval, DocumentRetrievalVector};

/// Write side of a vector store
///
/// Implementations:
/// - `InMemoryVectorStore`: process-local store with cosine similarity
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert or replace vectors keyed by passage ID
    ///
    /// Returns the IDs the store confirms as stored. Items missing from the
    /// returned list are counted as failed by the ingestion pipeline.
    async fn upsert(&self, vectors: Vec<DocumentRetrievalVector>) -> Result<Vec<Uuid>>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Read side of a vector store
#[async_trait]
pub trait VectorRetriever: Send + Sync {
    /// Return at most `top_k` passages ranked by similarity, best first
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<DocumentRetrieval>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
