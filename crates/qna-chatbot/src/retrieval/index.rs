//! In-memory embedding index built once at startup

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::{Document, ScoredDocument};

/// A document together with its embedding
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// Read-only similarity index over the knowledge base
///
/// Built once from the full document set; there is no insert or delete, so
/// it can be shared across requests behind an `Arc` without locking.
pub struct EmbeddingIndex {
    entries: Vec<IndexedDocument>,
    dimensions: usize,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingIndex {
    /// Embed every document and build the index
    pub async fn build(
        documents: Vec<Document>,
        embedder: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
    ) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let mut entries = Vec::with_capacity(documents.len());
        let mut dimensions = 0;

        tracing::info!(
            "Embedding {} documents with {} (batch size {})",
            documents.len(),
            embedder.name(),
            batch_size
        );

        for batch in documents.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let embeddings = embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            for (document, embedding) in batch.iter().zip(embeddings) {
                if dimensions == 0 {
                    dimensions = embedding.len();
                }
                if embedding.is_empty() || embedding.len() != dimensions {
                    return Err(Error::embedding(format!(
                        "Document row {} has embedding dimension {}, expected {}",
                        document.row,
                        embedding.len(),
                        dimensions
                    )));
                }
                entries.push(IndexedDocument {
                    document: document.clone(),
                    embedding,
                });
            }

            tracing::debug!("Indexed {}/{} documents", entries.len(), documents.len());
        }

        tracing::info!("Embedding index ready: {} documents, {} dimensions", entries.len(), dimensions);

        Ok(Self {
            entries,
            dimensions,
            embedder,
        })
    }

    /// Return the `k` documents most similar to `query`, best first
    ///
    /// Equal scores keep knowledge base order.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        if query_embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Query embedding has dimension {}, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        Ok(self.search(&query_embedding, k))
    }

    /// Rank stored documents against an already computed embedding
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredDocument> {
        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&entry.embedding, query_embedding),
            })
            .collect();

        // sort_by is stable, so ties stay in row order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index holds no documents
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
