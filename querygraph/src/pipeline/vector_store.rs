//! Vector store collaborator used as long-term memory of seen metrics.
//!
//! **Interaction**: `embedding` upserts one [`Document`] per ticker; `retrieval` runs
//! [`VectorStore::similarity_search`] with the user's original query.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AgentError;

/// Text plus metadata, as stored and returned by a [`VectorStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Turns texts into vectors, one per input, all of the same dimension.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AgentError>;

    fn dimension(&self) -> usize;
}

/// Deterministic bag-of-words embedder: each lowercase alphanumeric token is hashed
/// into one of `dimension` buckets.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// `dimension` is clamped to at least 1.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AgentError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Document store with semantic search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces documents; returns how many were written.
    async fn upsert(&self, documents: Vec<Document>) -> Result<usize, AgentError>;

    /// Top `k` documents by similarity to `query`, best first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, AgentError>;
}

/// Entry in the vector store.
#[derive(Clone)]
struct VectorEntry {
    vector: Vec<f32>,
    document: Document,
}

/// Pure in-memory vector store. Documents are keyed by a hash of their content, so
/// upserting the same text twice keeps one copy.
pub struct InMemoryVectorStore {
    data: DashMap<String, VectorEntry>,
    embedder: Arc<dyn Embedder>,
}

impl InMemoryVectorStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            data: DashMap::new(),
            embedder,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Content-derived document id.
    pub fn content_id(text: &str) -> String {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Computes cosine similarity between two vectors.
    ///
    /// Returns 0.0 if either vector has zero magnitude.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot_product / (norm_a * norm_b)
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, documents: Vec<Document>) -> Result<usize, AgentError> {
        if documents.is_empty() {
            return Ok(0);
        }
        let texts: Vec<&str> = documents.iter().map(|d| d.page_content.as_str()).collect();
        let vectors = self.embedder.embed(&texts)?;
        if vectors.len() != documents.len() {
            return Err(AgentError::ExecutionFailed(format!(
                "embedder returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }
        let count = documents.len();
        for (document, vector) in documents.into_iter().zip(vectors) {
            let id = Self::content_id(&document.page_content);
            self.data.insert(id, VectorEntry { vector, document });
        }
        tracing::debug!(count, total = self.data.len(), "upserted documents");
        Ok(count)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, AgentError> {
        if k == 0 || self.data.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self
            .embedder
            .embed(&[query])?
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::ExecutionFailed("No vector returned".into()))?;

        let mut scored: Vec<(f32, String, Document)> = self
            .data
            .iter()
            .map(|entry| {
                let score = Self::cosine_similarity(&query_vec, &entry.vector);
                (score, entry.key().clone(), entry.document.clone())
            })
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        Ok(scored.into_iter().take(k).map(|(_, _, doc)| doc).collect())
    }
}
