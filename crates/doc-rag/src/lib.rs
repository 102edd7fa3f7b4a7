//! doc-rag: document ingestion and retrieval-augmented question answering
//!
//! Two pipelines make up the crate:
//!
//! - [`IngestionPipeline`] turns an [`InputDocument`] into stored vector
//!   passages and reports a [`StoreDocumentResult`] with success, partial
//!   and error accounting.
//! - [`QueryPipeline`] turns a [`Query`] into a [`RagResponse`] whose
//!   `sources` are the retrieved passages, in retrieval order.
//!
//! Both talk to their collaborators (extraction, chunking, embeddings,
//! vector store, LLM, events) only through the traits in [`providers`].
//! Ollama and in-process adapters are included.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod query;
pub mod retrieval;
pub mod types;

pub use config::{EmbeddingFailurePolicy, RagConfig};
pub use error::{Error, Result};
pub use ingestion::IngestionPipeline;
pub use query::QueryPipeline;
pub use types::{
    DocumentRetrieval, DocumentRetrievalVector, DocumentType, Embedding, ExtractedContent,
    InputDocument, Message, MessageRole, Query, RagResponse, Response, StoreDocumentResult,
    StoreDocumentStatus,
};
