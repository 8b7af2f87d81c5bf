//! Streaming types for graph runs.
//!
//! Defines stream modes and events emitted by `CompiledStateGraph::stream`.

use crate::graph::RunOutcome;
use crate::state::{PartialState, State};

/// Stream mode selector: which kinds of per-node events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit the full merged state after each node completes.
    Values,
    /// Emit the node id and the partial update it returned.
    Updates,
}

/// Event emitted while running a graph.
#[derive(Debug)]
pub enum StreamEvent {
    /// Full state snapshot after a node's update was merged.
    Values(State),
    /// The partial update a node returned, before merging.
    Updates {
        node_id: String,
        update: PartialState,
    },
    /// Last event of every stream: the run's outcome.
    Finished(RunOutcome),
}
