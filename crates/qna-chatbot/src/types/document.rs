//! Knowledge base document types

use serde::{Deserialize, Serialize};

/// One knowledge base record, rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Zero-based data row index in the source file
    pub row: usize,
    /// Path of the file the record came from
    pub source: String,
    /// Record text, one `header: value` line per column
    pub content: String,
}

impl Document {
    /// Create a new document
    pub fn new(row: usize, source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            row,
            source: source.into(),
            content: content.into(),
        }
    }
}

/// A document paired with its similarity to a query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    /// Cosine similarity (-1.0 to 1.0, higher is more similar)
    pub score: f32,
}
