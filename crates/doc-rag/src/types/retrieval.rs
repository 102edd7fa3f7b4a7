//! Passages before and after vector search

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Metadata;

/// A passage of text, either freshly chunked or returned by a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRetrieval {
    /// Passage ID, generated when absent
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Metadata inherited from the parent document plus chunk position
    #[serde(default)]
    pub metadata: Metadata,
    /// Relevance score (set by retrieval)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl DocumentRetrieval {
    /// Create a passage with a fresh ID
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata: Metadata::new(),
            score: None,
        }
    }

    /// Use a specific ID
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach a relevance score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// A passage paired with its embedding vector, ready for the vector store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRetrievalVector {
    /// The passage
    #[serde(flatten)]
    pub document: DocumentRetrieval,
    /// Embedding vector
    pub vector: Vec<f32>,
}

impl DocumentRetrievalVector {
    /// Combine a passage with its vector
    pub fn new(document: DocumentRetrieval, vector: Vec<f32>) -> Self {
        Self { document, vector }
    }

    /// Passage ID
    pub fn id(&self) -> Uuid {
        self.document.id
    }

    /// Vector dimensionality
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Drop the vector, keeping the passage
    pub fn into_document(self) -> DocumentRetrieval {
        self.document
    }
}
