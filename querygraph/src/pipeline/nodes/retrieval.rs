use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Node;
use crate::pipeline::fields::{PARSED_QUERY, RETRIEVED_DOCS};
use crate::pipeline::model::FinancialQuery;
use crate::pipeline::vector_store::VectorStore;
use crate::pipeline::RETRIEVAL;
use crate::state::{PartialState, State};

/// Documents returned per query.
pub const RETRIEVAL_K: usize = 3;

/// Looks up stored documents similar to the user's original query.
pub struct RetrievalNode {
    store: Arc<dyn VectorStore>,
}

impl RetrievalNode {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node for RetrievalNode {
    fn id(&self) -> &str {
        RETRIEVAL
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        let Some(query) = state.get_as::<FinancialQuery>(PARSED_QUERY)? else {
            return Ok(PartialState::new());
        };
        let docs: Vec<String> = match self
            .store
            .similarity_search(&query.original_query, RETRIEVAL_K)
            .await
        {
            Ok(docs) => docs.into_iter().map(|d| d.page_content).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "retrieval failed");
                Vec::new()
            }
        };
        PartialState::new().with_as(RETRIEVED_DOCS, &docs)
    }
}
