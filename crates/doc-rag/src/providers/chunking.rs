//! Text chunking trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DocumentRetrieval, ExtractedContent};

/// Splits extracted text into ordered passages
///
/// Every passage carries the parent metadata.
#[async_trait]
pub trait TextChunker: Send + Sync {
    /// Split content into passages, in document order
    async fn chunk(&self, content: &ExtractedContent) -> Result<Vec<DocumentRetrieval>>;

    /// Get chunker name for logging
    fn name(&self) -> &str {
        "chunker"
    }
}
