//! Node middleware: wraps every node call made by the executor.
//!
//! Used for cross-cutting concerns (logging, timing) without touching nodes. The
//! middleware receives the node id, an owned copy of the current state and the
//! continuation that actually runs the node.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::{PartialState, State};

/// Boxed future returned by a node continuation.
pub type NodeFuture = Pin<Box<dyn Future<Output = Result<PartialState, AgentError>> + Send>>;

/// Continuation that runs the wrapped node on the given state.
pub type NodeInvoker = Box<dyn FnOnce(State) -> NodeFuture + Send>;

/// Around-advice for node execution.
///
/// **Interaction**: Attached with `StateGraph::with_middleware` or
/// `compile_with_middleware`; `CompiledStateGraph` calls `around_run` instead of the
/// node directly. Implementations must call `inner` at most once.
#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeInvoker,
    ) -> Result<PartialState, AgentError>;
}
