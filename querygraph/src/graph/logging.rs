//! Structured logging for graph execution.
//!
//! Thin wrappers over `tracing` so the executor logs node execution, state merges,
//! routing decisions and run results with consistent fields.

use crate::error::RunFault;

use super::edge::Target;

/// Log node execution start.
pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id = node_id, "Starting node execution");
}

/// Log node execution completion with the keys its update wrote.
pub fn log_node_complete(node_id: &str, written: &[&str]) {
    tracing::debug!(node_id = node_id, ?written, "Node execution complete");
}

/// Log state update after the merge.
pub fn log_state_update(node_id: &str, state_len: usize, has_error: bool) {
    tracing::debug!(node_id = node_id, state_len, has_error, "State updated");
}

/// Log a conditional routing decision.
pub fn log_route(node_id: &str, label: &str, target: &Target) {
    tracing::debug!(
        node_id = node_id,
        label = label,
        target = target.as_str(),
        "Route selected"
    );
}

/// Log graph execution start.
pub fn log_graph_start(entry: &str) {
    tracing::info!(entry = entry, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

/// Log a run-fatal fault.
pub fn log_graph_error(fault: &RunFault) {
    tracing::error!(error = %fault, "Graph execution halted");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        // These should not panic without a subscriber
        log_node_start("test_node");
        log_node_complete("test_node", &["a", "b"]);
        log_state_update("test_node", 2, false);
        log_route("test_node", "continue", &Target::End);
        log_graph_start("test_node");
        log_graph_complete(1);
        log_graph_error(&RunFault::MissingEdge("test_node".to_string()));
    }
}
