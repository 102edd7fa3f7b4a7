//! Input documents and extracted content

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Free-form metadata attached to documents and passages
pub type Metadata = HashMap<String, serde_json::Value>;

/// Declared document types accepted at ingestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
}

impl DocumentType {
    /// Detect document type from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" | "md" | "markdown" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Lowercase identifier, as stored in chunk metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw document handed to the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputDocument {
    /// Original filename
    pub filename: String,
    /// Raw binary content
    pub content: Vec<u8>,
    /// Declared document type
    pub document_type: DocumentType,
}

impl InputDocument {
    /// Create a new input document
    pub fn new(filename: impl Into<String>, content: Vec<u8>, document_type: DocumentType) -> Self {
        Self {
            filename: filename.into(),
            content,
            document_type,
        }
    }

    /// Create an input document, deriving its type from the filename extension
    pub fn from_filename(filename: impl Into<String>, content: Vec<u8>) -> Result<Self> {
        let filename = filename.into();
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("");

        let document_type = DocumentType::from_extension(extension)
            .ok_or_else(|| Error::UnsupportedDocumentType(format!("'{}' ({})", extension, filename)))?;

        Ok(Self::new(filename, content, document_type))
    }

    /// Size of the raw content in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Normalized text and metadata produced by extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedContent {
    /// Extracted text
    pub text: String,
    /// Document-level metadata (format, page count, hash, ...)
    #[serde(default)]
    pub metadata: Metadata,
}

impl ExtractedContent {
    /// Create extracted content
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Return a copy with `extra` merged over the existing metadata
    ///
    /// Keys in `extra` replace existing keys; `self` is left untouched.
    pub fn with_metadata(&self, extra: Metadata) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.extend(extra);

        Self {
            text: self.text.clone(),
            metadata,
        }
    }
}
