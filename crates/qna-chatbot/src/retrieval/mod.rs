//! Vector similarity retrieval over the knowledge base

mod index;

pub use index::{cosine_similarity, EmbeddingIndex, IndexedDocument};
