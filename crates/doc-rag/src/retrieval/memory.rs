//! In-memory vector store with cosine similarity search

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::{VectorRetriever, VectorStoreProvider};
use crate::types::{DocumentRetrieval, DocumentRetrievalVector};

/// Cosine similarity in [-1, 1]; 0.0 for empty, mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

struct StoredVector {
    /// Insertion sequence, breaks score ties
    seq: u64,
    entry: DocumentRetrievalVector,
}

/// Process-local vector store keyed by passage ID
///
/// Upserting an existing ID replaces it. Vectors whose length differs from
/// the configured dimensionality are rejected one by one and left out of
/// the confirmed IDs.
pub struct InMemoryVectorStore {
    dimensions: usize,
    min_score: Option<f32>,
    entries: DashMap<Uuid, StoredVector>,
    next_seq: AtomicU64,
}

impl InMemoryVectorStore {
    /// Create an empty store for vectors of `dimensions` length
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            min_score: None,
            entries: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Drop search hits scoring below `min_score`
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Configured dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Look up a stored passage
    pub fn get(&self, id: &Uuid) -> Option<DocumentRetrievalVector> {
        self.entries.get(id).map(|stored| stored.entry.clone())
    }

    /// Remove a passage, returning whether it existed
    pub fn remove(&self, id: &Uuid) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Number of stored vectors
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn upsert(&self, vectors: Vec<DocumentRetrievalVector>) -> Result<Vec<Uuid>> {
        let mut stored = Vec::with_capacity(vectors.len());

        for vector in vectors {
            let id = vector.id();
            if vector.dimensions() != self.dimensions {
                tracing::warn!(
                    "Rejecting vector {}: expected {} dimensions, got {}",
                    id,
                    self.dimensions,
                    vector.dimensions()
                );
                continue;
            }

            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            self.entries.insert(id, StoredVector { seq, entry: vector });
            stored.push(id);
        }

        tracing::debug!("Upserted {} vectors ({} total)", stored.len(), self.entries.len());
        Ok(stored)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.count())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl VectorRetriever for InMemoryVectorStore {
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<DocumentRetrieval>> {
        if vector.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        let mut scored: Vec<(f32, u64, DocumentRetrieval)> = self
            .entries
            .iter()
            .map(|item| {
                let stored = item.value();
                let score = cosine_similarity(vector, &stored.entry.vector);
                (score, stored.seq, stored.entry.document.clone())
            })
            .filter(|(score, _, _)| self.min_score.map_or(true, |min| *score >= min))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, _, document)| document.with_score(score))
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
