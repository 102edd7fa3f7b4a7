//! Text extraction trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExtractedContent, InputDocument};

/// Converts raw document bytes into normalized text and metadata
///
/// Implementations:
/// - `LocalExtractor`: in-process PDF/DOCX/TXT parsing
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from a document
    async fn extract(&self, document: &InputDocument) -> Result<ExtractedContent>;

    /// Get extractor name for logging
    fn name(&self) -> &str {
        "extractor"
    }
}
