//! Document ingestion: local parsing, chunking and the ingestion pipeline

mod chunker;
mod parser;
mod pipeline;

pub use chunker::{chunker_from_config, FixedSizeChunker, SentenceChunker};
pub use parser::FileParser;
pub use pipeline::{enrich_metadata, IngestionPipeline};
