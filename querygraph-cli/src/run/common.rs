//! Shared run logic: build the pipeline graph and invoke or stream it.
//!
//! Used by [`run_with_config`](super::run_with_config) and by tests that inject
//! `MockLlm` / `StaticMarketData`.

use std::collections::HashSet;

use querygraph::pipeline::{initial_state, pipeline_graph, Collaborators};
use querygraph::{RunOutcome, StreamEvent, StreamMode};
use tokio_stream::StreamExt;

use crate::middleware::WithNodeLogging;

use super::Error;

/// Runs the pipeline with the given collaborators.
///
/// With `stream`, each finished node is printed to stderr as it completes; the outcome
/// is the one carried by the final `Finished` event.
pub(crate) async fn run_pipeline(
    user_message: &str,
    collaborators: &Collaborators,
    stream: bool,
) -> Result<RunOutcome, Error> {
    let compiled = pipeline_graph(collaborators).with_node_logging().compile()?;
    let input = initial_state(user_message)?;

    if !stream {
        return Ok(compiled.invoke(input).await);
    }

    let modes: HashSet<StreamMode> = [StreamMode::Updates].into_iter().collect();
    let mut events = compiled.stream(input, modes);
    while let Some(event) = events.next().await {
        match event {
            StreamEvent::Updates { node_id, .. } => eprintln!("[{}] done", node_id),
            StreamEvent::Finished(outcome) => return Ok(outcome),
            StreamEvent::Values(_) => {}
        }
    }
    Err("stream ended without an outcome".into())
}
