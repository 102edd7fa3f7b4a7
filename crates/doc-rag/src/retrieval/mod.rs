//! Vector storage and similarity search

mod memory;

pub use memory::{cosine_similarity, InMemoryVectorStore};
