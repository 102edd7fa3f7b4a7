//! Local text extraction for PDF, DOCX and plain text

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::{DocumentType, ExtractedContent, InputDocument, Metadata};

/// Glyph names some PDF fonts leak into extracted text, with ASCII replacements
const GLYPH_NAMES: &[(&str, &str)] = &[
    ("uni2010", "-"),
    ("uni2011", "-"),
    ("uni2012", "-"),
    ("uni2013", "-"),
    ("uni2014", "--"),
    ("uni2018", "'"),
    ("uni2019", "'"),
    ("uni201C", "\""),
    ("uni201D", "\""),
    ("uni2022", "* "),
    ("uni2026", "..."),
    ("uni00A0", " "),
    ("uni2002", " "),
    ("uni2003", " "),
    ("uni2009", " "),
    ("uni2212", "-"),
];

/// Typographic characters folded to ASCII
const CHAR_FOLDS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2022}', "* "),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Replace leaked glyph names and fold typographic characters
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = text.replace('\0', "");

    for (name, replacement) in GLYPH_NAMES {
        result = result
            .replace(&format!("({})", name), replacement)
            .replace(&format!("<{}>", name), replacement)
            .replace(name, replacement);
    }

    let mut folded = String::with_capacity(result.len());
    for c in result.chars() {
        match CHAR_FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(c),
        }
    }

    folded
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hash content for deduplication
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Synchronous multi-format parser
///
/// CPU-bound; async callers should run it on the blocking pool (see
/// [`crate::providers::local::LocalExtractor`]).
pub struct FileParser;

impl FileParser {
    /// Extract text and document-level metadata
    ///
    /// Adds `format`, `content_hash` and `char_count` metadata, plus
    /// `page_count` for PDFs. A document without any text is an error.
    pub fn extract(document: &InputDocument) -> Result<ExtractedContent> {
        let filename = document.filename.as_str();
        let mut metadata = Metadata::new();

        let text = match document.document_type {
            DocumentType::Pdf => {
                let (text, pages) = Self::parse_pdf(filename, &document.content)?;
                metadata.insert("page_count".to_string(), json!(pages));
                text
            }
            DocumentType::Docx => Self::parse_docx(filename, &document.content)?,
            DocumentType::Txt => Self::parse_text(&document.content),
        };

        if text.trim().is_empty() {
            return Err(Error::extraction(filename, "No text content could be extracted"));
        }

        metadata.insert("format".to_string(), json!(document.document_type.as_str()));
        metadata.insert("content_hash".to_string(), json!(hash_content(&text)));
        metadata.insert("char_count".to_string(), json!(text.chars().count()));

        tracing::debug!(
            "Extracted {} chars from '{}' ({})",
            text.len(),
            filename,
            document.document_type
        );

        Ok(ExtractedContent::new(text, metadata))
    }

    /// Parse PDF, falling back to a raw content-stream scan when pdf-extract fails
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<(String, usize)> {
        let raw = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed on '{}': {}, trying fallback", filename, e);
                Self::extract_pdf_text_fallback(filename, data)?
            }
        };

        let page_count = match lopdf::Document::load_mem(data) {
            Ok(doc) => doc.get_pages().len(),
            Err(_) => 1,
        };

        Ok((cleanup_pdf_text(&raw), page_count))
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(filename, format!("Failed to load PDF: {}", e)))?;

        let mut all_text = String::new();
        for (page_num, page_id) in doc.get_pages() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let text = Self::extract_text_from_content(&content);
                    if !text.is_empty() {
                        all_text.push_str(&text);
                        all_text.push('\n');
                    }
                }
                Err(e) => tracing::debug!("Could not get content for page {}: {}", page_num, e),
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::extraction(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Pull string operands of `Tj`/`TJ` operators out of BT..ET blocks
    fn extract_text_from_content(content: &[u8]) -> String {
        let content_str = String::from_utf8_lossy(content);
        let mut text = String::new();
        let mut in_text_block = false;

        for line in content_str.lines().map(str::trim) {
            match line {
                "BT" => in_text_block = true,
                "ET" => {
                    in_text_block = false;
                    if !text.ends_with(' ') && !text.is_empty() {
                        text.push(' ');
                    }
                }
                _ if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) => {
                    if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                        if start < end {
                            let decoded = line[start + 1..end]
                                .replace("\\(", "(")
                                .replace("\\)", ")")
                                .replace("\\n", "\n")
                                .replace("\\\\", "\\");
                            text.push_str(&decoded);
                        }
                    }
                }
                _ => {}
            }
        }

        text.trim_end().to_string()
    }

    /// Parse DOCX paragraphs, one line per paragraph
    fn parse_docx(filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(content.trim_end().to_string())
    }

    /// Decode text as UTF-8, replacing invalid sequences
    fn parse_text(data: &[u8]) -> String {
        String::from_utf8_lossy(data).replace("\r\n", "\n")
    }
}
