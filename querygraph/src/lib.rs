//! # querygraph
//!
//! A small state-graph engine and the financial query pipeline built on it. One state
//! map flows through the graph: every node reads the full state and returns a
//! **partial update** that is merged into it, and routers pick each node's successor
//! from a declared label set.
//!
//! ## Design Principles
//!
//! - **Partial updates**: nodes return only the fields they change; merges never delete.
//! - **Explicit halting**: a node signals an expected failure by writing `error`; only a
//!   [`graph::HaltRouter`] wired after it ends the run. The executor itself never
//!   inspects `error`.
//! - **Validated graphs**: `StateGraph::compile` rejects unknown nodes, unmapped router
//!   labels, missing edges and cycles, so every compiled run terminates.
//!
//! ## Main Modules
//!
//! - [`state`]: `State`, `PartialState`, `merge`, reserved field names.
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Router`, node middleware.
//! - [`stream`]: `StreamMode` and `StreamEvent` for `CompiledStateGraph::stream`.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, and `ChatOpenAI` behind the `openai` feature.
//! - [`pipeline`]: the eight-stage financial query pipeline and its collaborators.
//!
//! ## Features
//!
//! - `openai`: OpenAI-compatible chat via `async-openai`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use querygraph::pipeline::{
//!     build_pipeline, initial_state, Collaborators, HashingEmbedder, InMemoryVectorStore,
//!     StaticMarketData,
//! };
//! use querygraph::MockLlm;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let collaborators = Collaborators::new(
//!     Arc::new(MockLlm::with_content(r#"{"tickers": [], "intent": "general_chat"}"#)),
//!     Arc::new(StaticMarketData::new()),
//!     Arc::new(InMemoryVectorStore::new(Arc::new(HashingEmbedder::default()))),
//! );
//! let graph = build_pipeline(&collaborators)?;
//! let outcome = graph.invoke(initial_state("hi")?).await;
//! println!("{:?}", outcome.state.get("final_response"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod pipeline;
pub mod state;
pub mod stream;

pub use error::{AgentError, RunFault};
pub use graph::{
    CompilationError, CompiledStateGraph, FnNode, HaltRouter, Node, NodeMiddleware, Router,
    RunOutcome, RunStatus, StateGraph, END, START,
};
pub use llm::{LlmClient, LlmResponse, MockLlm};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use message::Message;
pub use state::{merge, PartialState, State, ERROR_FIELD, FAULT_FIELD, MESSAGES_FIELD};
pub use stream::{StreamEvent, StreamMode};
