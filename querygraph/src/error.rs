//! Error types for node execution and for runs that stop on a fault.
//!
//! Expected domain failures never appear here: a node reports those by writing the
//! `error` field into its partial update. These types cover the unexpected path.

use thiserror::Error;

/// Node execution error.
///
/// Returned by `Node::run` when a step faults outside its expected-failure channel.
/// The executor treats any `AgentError` as run-fatal.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, collaborator unreachable).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A state value could not be converted to or from its typed form.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Run-fatal condition that halted a run.
///
/// Recorded in `RunStatus::Halted` and, as display text, in the state's `__fault__`
/// field. The executor never retries; the caller decides whether to rerun.
#[derive(Debug, Error)]
pub enum RunFault {
    /// The node's operation returned an error.
    #[error("node `{node}` failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: AgentError,
    },

    /// The node's operation panicked.
    #[error("node `{node}` panicked: {message}")]
    NodePanicked { node: String, message: String },

    /// A router returned a label that has no target in its edge mapping.
    #[error("router after `{node}` returned unmapped label `{label}`")]
    UnmappedLabel { node: String, label: String },

    /// The node has no outgoing edge.
    #[error("node `{0}` has no outgoing edge")]
    MissingEdge(String),

    /// Edge resolution produced a node that is not part of the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),
}
