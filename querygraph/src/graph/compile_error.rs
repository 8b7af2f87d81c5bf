//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the graph definition is inconsistent:
//! unknown or repeated nodes, a missing entry, unmapped router labels, nodes without an outgoing
//! edge, or a cycle.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// Every routing contract violation that can be detected statically is reported here,
/// so a compiled graph only faults at run time on node errors or on labels produced
/// by routers whose closures escape their declared set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A node was registered under a reserved sentinel id (START or END).
    #[error("node id is reserved: {0}")]
    ReservedName(String),

    /// `add_node` was called more than once with the same id.
    #[error("node id registered twice: {0}")]
    DuplicateNode(String),

    /// No entry node was set (neither `set_entry_point` nor `add_edge(START, ..)`).
    #[error("graph has no entry node")]
    MissingEntry,

    /// The entry node was set more than once, to different nodes.
    #[error("graph entry set twice: {0}")]
    DuplicateEntry(String),

    /// A node id in the entry or an edge was not registered via `add_node` (and is not END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A node has more than one outgoing edge definition.
    #[error("node has more than one outgoing edge: {0}")]
    DuplicateEdge(String),

    /// A router declares a label that has no target in its path map.
    #[error("router after `{node}` declares label `{label}` with no target")]
    UnmappedLabel { node: String, label: String },

    /// A path map contains a label the router never produces.
    #[error("path map after `{node}` has label `{label}` the router does not declare")]
    UndeclaredLabel { node: String, label: String },

    /// A node reachable from the entry has no outgoing edge (not even to END).
    #[error("node has no outgoing edge: {0}")]
    MissingEdge(String),

    /// An edge points back to a node already on the current path.
    #[error("cycle detected: {0}")]
    CycleDetected(String),
}
