//! Graph node trait: one named step in a StateGraph.
//!
//! Receives the full current state and returns a partial update that the executor
//! merges. Expected failures go into the update's `error` field; `Err` is reserved
//! for unexpected faults and halts the run.

use std::fmt;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::{PartialState, State};

use super::RunContext;

/// One step in a graph: full state in, partial update out.
///
/// **Interaction**: Registered with `StateGraph::add_node`; called by
/// `CompiledStateGraph::invoke` once per visit, strictly one node at a time.
#[async_trait]
pub trait Node: Send + Sync {
    /// Node id (e.g. `"input_parsing"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: read the state, return the fields to overwrite.
    ///
    /// Return an empty update when there is nothing to change and
    /// `PartialState::error(..)` for an expected domain failure.
    async fn run(&self, state: &State) -> Result<PartialState, AgentError>;

    /// Optional variant with run context (streaming).
    ///
    /// Default implementation calls `run` and ignores the context.
    async fn run_with_context(
        &self,
        state: &State,
        _ctx: &RunContext,
    ) -> Result<PartialState, AgentError> {
        self.run(state).await
    }
}

/// Node backed by a synchronous closure. Handy for pass-through stages and tests.
pub struct FnNode<F> {
    id: String,
    f: F,
}

impl<F> FnNode<F>
where
    F: Fn(&State) -> Result<PartialState, AgentError> + Send + Sync,
{
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self { id: id.into(), f }
    }
}

impl<F> fmt::Debug for FnNode<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode").field("id", &self.id).finish()
    }
}

#[async_trait]
impl<F> Node for FnNode<F>
where
    F: Fn(&State) -> Result<PartialState, AgentError> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        (self.f)(state)
    }
}
