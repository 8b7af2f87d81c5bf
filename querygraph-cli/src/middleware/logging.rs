//! Logging middleware that records node enter/exit around each node call.

use std::time::Instant;

use async_trait::async_trait;
use querygraph::graph::NodeInvoker;
use querygraph::{AgentError, NodeMiddleware, PartialState, State};

/// Middleware that logs node enter/exit (with elapsed time and written fields) around
/// each node call.
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeInvoker,
    ) -> Result<PartialState, AgentError> {
        tracing::info!(node = node_id, "enter");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(update) => {
                let written: Vec<&str> = update.keys().collect();
                tracing::info!(node = node_id, elapsed_ms, ?written, "exit");
            }
            Err(e) => tracing::warn!(node = node_id, elapsed_ms, error = %e, "exit with error"),
        }
        result
    }
}
