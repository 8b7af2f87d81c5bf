use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::Node;
use crate::pipeline::fields::NORMALIZED_METRICS;
use crate::pipeline::model::MarketMetrics;
use crate::pipeline::vector_store::{Document, VectorStore};
use crate::pipeline::EMBEDDING;
use crate::state::{PartialState, State};

/// Stores one document per normalized metric. Writes nothing to state; a store failure
/// is logged and ignored.
pub struct EmbeddingNode {
    store: Arc<dyn VectorStore>,
}

impl EmbeddingNode {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node for EmbeddingNode {
    fn id(&self) -> &str {
        EMBEDDING
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        let metrics: Vec<MarketMetrics> = state.get_as(NORMALIZED_METRICS)?.unwrap_or_default();
        if metrics.is_empty() {
            return Ok(PartialState::new());
        }
        let documents = metrics
            .iter()
            .map(|m| {
                Document::new(m.document_text())
                    .with_metadata("ticker", Value::String(m.ticker.clone()))
                    .with_metadata("type", Value::String("market_metrics".into()))
                    .with_metadata("date", Value::String(m.last_updated.clone()))
            })
            .collect();
        if let Err(e) = self.store.upsert(documents).await {
            tracing::warn!(error = %e, "failed to store embeddings");
        }
        Ok(PartialState::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::vector_store::{HashingEmbedder, InMemoryVectorStore};
    use serde_json::json;

    struct BrokenStore;

    #[async_trait]
    impl VectorStore for BrokenStore {
        async fn upsert(&self, _documents: Vec<Document>) -> Result<usize, AgentError> {
            Err(AgentError::ExecutionFailed("index offline".into()))
        }

        async fn similarity_search(&self, _q: &str, _k: usize) -> Result<Vec<Document>, AgentError> {
            Err(AgentError::ExecutionFailed("index offline".into()))
        }
    }

    fn metrics_state() -> State {
        State::from_partial(PartialState::new().with(
            NORMALIZED_METRICS,
            json!([
                {"ticker": "AAPL", "price": 190.0, "currency": "USD", "last_updated": "2024-05-01T12:00:00Z"},
                {"ticker": "MSFT", "price": 410.0, "currency": "USD", "last_updated": "2024-05-01T12:00:00Z"}
            ]),
        ))
    }

    /// **Scenario**: One document per metric lands in the store; state is untouched.
    #[tokio::test]
    async fn upserts_one_document_per_metric() {
        let store = Arc::new(InMemoryVectorStore::new(Arc::new(HashingEmbedder::default())));
        let out = EmbeddingNode::new(store.clone()).run(&metrics_state()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(store.len(), 2);
        let hits = store.similarity_search("AAPL", 1).await.unwrap();
        assert_eq!(hits[0].metadata["type"], json!("market_metrics"));
        assert_eq!(hits[0].metadata["ticker"], json!("AAPL"));
    }

    /// **Scenario**: A failing store is not a fault.
    #[tokio::test]
    async fn store_failure_is_ignored() {
        let out = EmbeddingNode::new(Arc::new(BrokenStore)).run(&metrics_state()).await.unwrap();
        assert!(out.is_empty());
    }
}
