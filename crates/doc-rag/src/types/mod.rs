//! Value objects passed between pipeline steps

pub mod document;
pub mod embedding;
pub mod ingestion;
pub mod message;
pub mod query;
pub mod response;
pub mod retrieval;

pub use document::{DocumentType, ExtractedContent, InputDocument, Metadata};
pub use embedding::Embedding;
pub use ingestion::{StoreDocumentResult, StoreDocumentStatus};
pub use message::{Message, MessageRole};
pub use query::Query;
pub use response::{RagResponse, Response};
pub use retrieval::{DocumentRetrieval, DocumentRetrievalVector};
