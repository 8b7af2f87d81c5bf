//! Financial query pipeline built on the graph engine.
//!
//! ```text
//! input_parsing ─halt─▶ END
//!       │continue
//!       ▼
//! query_planner ─reason─────────────────────────────────────────────┐
//!       │fetch                                                       ▼
//! data_fetch ▶ data_normalization ▶ embedding ▶ retrieval ▶ reasoning ▶ response_generation ▶ END
//! ```
//!
//! Collaborators (LLM, market data, vector store) are injected through
//! [`Collaborators`], so tests run the whole graph with `MockLlm`,
//! `StaticMarketData` and `InMemoryVectorStore`.

pub mod fields;
pub mod market_data;
pub mod model;
pub mod nodes;
pub mod router;
pub mod vector_store;

use std::sync::Arc;

use crate::error::AgentError;
use crate::graph::{
    CompilationError, CompiledStateGraph, HaltRouter, NodeMiddleware, StateGraph, END, START,
};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::PartialState;

pub use market_data::{fetch_market_data, FetchPolicy, MarketDataSource, StaticMarketData};
pub use model::{AnalysisResult, FinancialInsight, FinancialQuery, MarketMetrics, QueryIntent};
pub use nodes::{
    DataFetchNode, DataNormalizationNode, EmbeddingNode, InputParsingNode, QueryPlannerNode,
    ReasoningNode, ResponseGenerationNode, RetrievalNode,
};
pub use router::{intent_router, route_intent, IntentRouter, RouteIntent};
pub use vector_store::{Document, Embedder, HashingEmbedder, InMemoryVectorStore, VectorStore};

pub const INPUT_PARSING: &str = "input_parsing";
pub const QUERY_PLANNER: &str = "query_planner";
pub const DATA_FETCH: &str = "data_fetch";
pub const DATA_NORMALIZATION: &str = "data_normalization";
pub const EMBEDDING: &str = "embedding";
pub const RETRIEVAL: &str = "retrieval";
pub const REASONING: &str = "reasoning";
pub const RESPONSE_GENERATION: &str = "response_generation";

/// External services the pipeline nodes talk to.
///
/// `llm` parses the request and formats the report; `reasoning_llm` writes the
/// analysis. Both are the same client unless [`Collaborators::with_reasoning_llm`]
/// sets another, e.g. one sampling at a higher temperature.
#[derive(Clone)]
pub struct Collaborators {
    pub llm: Arc<dyn LlmClient>,
    pub reasoning_llm: Arc<dyn LlmClient>,
    pub market: Arc<dyn MarketDataSource>,
    pub store: Arc<dyn VectorStore>,
    pub fetch_policy: FetchPolicy,
}

impl Collaborators {
    /// Collaborators with the default fetch policy.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        market: Arc<dyn MarketDataSource>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            reasoning_llm: llm.clone(),
            llm,
            market,
            store,
            fetch_policy: FetchPolicy::default(),
        }
    }

    pub fn with_reasoning_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.reasoning_llm = llm;
        self
    }

    pub fn with_fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.fetch_policy = policy;
        self
    }
}

/// Declares the pipeline graph without compiling it.
pub fn pipeline_graph(collaborators: &Collaborators) -> StateGraph {
    let Collaborators {
        llm,
        reasoning_llm,
        market,
        store,
        fetch_policy,
    } = collaborators;

    let mut graph = StateGraph::new();
    graph
        .add_node(INPUT_PARSING, Arc::new(InputParsingNode::new(llm.clone())))
        .add_node(QUERY_PLANNER, Arc::new(QueryPlannerNode))
        .add_node(
            DATA_FETCH,
            Arc::new(DataFetchNode::new(market.clone(), fetch_policy.clone())),
        )
        .add_node(DATA_NORMALIZATION, Arc::new(DataNormalizationNode))
        .add_node(EMBEDDING, Arc::new(EmbeddingNode::new(store.clone())))
        .add_node(RETRIEVAL, Arc::new(RetrievalNode::new(store.clone())))
        .add_node(REASONING, Arc::new(ReasoningNode::new(reasoning_llm.clone())))
        .add_node(
            RESPONSE_GENERATION,
            Arc::new(ResponseGenerationNode::new(llm.clone())),
        );

    graph
        .add_edge(START, INPUT_PARSING)
        .add_conditional_edges(
            INPUT_PARSING,
            Arc::new(HaltRouter),
            [("halt", END), ("continue", QUERY_PLANNER)],
        )
        .add_conditional_edges(
            QUERY_PLANNER,
            Arc::new(intent_router()),
            [("fetch", DATA_FETCH), ("reason", REASONING)],
        )
        .add_edge(DATA_FETCH, DATA_NORMALIZATION)
        .add_edge(DATA_NORMALIZATION, EMBEDDING)
        .add_edge(EMBEDDING, RETRIEVAL)
        .add_edge(RETRIEVAL, REASONING)
        .add_edge(REASONING, RESPONSE_GENERATION)
        .add_edge(RESPONSE_GENERATION, END);
    graph
}

/// Builds and validates the pipeline graph.
pub fn build_pipeline(
    collaborators: &Collaborators,
) -> Result<CompiledStateGraph, CompilationError> {
    pipeline_graph(collaborators).compile()
}

/// Same as [`build_pipeline`], with middleware wrapping every node.
pub fn build_pipeline_with_middleware(
    collaborators: &Collaborators,
    middleware: Arc<dyn NodeMiddleware>,
) -> Result<CompiledStateGraph, CompilationError> {
    pipeline_graph(collaborators).compile_with_middleware(middleware)
}

/// Initial state for a run: a single user message.
pub fn initial_state(message: impl Into<String>) -> Result<PartialState, AgentError> {
    PartialState::from_messages(&[Message::user(message)])
}
