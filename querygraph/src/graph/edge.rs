//! Outgoing edges and next-node resolution.
//!
//! Each node has exactly one outgoing edge: a static target (another node or END) or
//! a router plus its label → target map.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RunFault;
use crate::state::State;

use super::logging;
use super::router::Router;
use super::state_graph::END;

/// Where control goes after a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Run the node with this id next.
    Node(String),
    /// Terminal marker: the run is complete.
    End,
}

impl Target {
    /// `END` maps to [`Target::End`]; any other id to [`Target::Node`].
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == END {
            Target::End
        } else {
            Target::Node(id)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Target::Node(id) => id,
            Target::End => END,
        }
    }
}

/// Outgoing edge of one node.
#[derive(Clone)]
pub enum Edge {
    /// Fixed successor.
    Static(Target),
    /// Successor chosen by `router`; each declared label maps to a target.
    Conditional {
        router: Arc<dyn Router>,
        targets: HashMap<String, Target>,
    },
}

impl Edge {
    /// Every target this edge can lead to.
    pub fn targets(&self) -> Vec<&Target> {
        match self {
            Edge::Static(t) => vec![t],
            Edge::Conditional { targets, .. } => {
                let mut all: Vec<&Target> = targets.values().collect();
                all.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                all
            }
        }
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Static(t) => f.debug_tuple("Static").field(t).finish(),
            Edge::Conditional { router, targets } => f
                .debug_struct("Conditional")
                .field("labels", &router.labels())
                .field("targets", targets)
                .finish(),
        }
    }
}

/// Resolves the successor of `node_id` for the post-merge `state`.
///
/// Static edges return their target unconditionally; conditional edges call the router
/// and look its label up in the target map. An unmapped label is a routing contract
/// violation and comes back as [`RunFault::UnmappedLabel`].
pub fn resolve_next(
    node_id: &str,
    state: &State,
    edges: &HashMap<String, Edge>,
) -> Result<Target, RunFault> {
    let edge = edges
        .get(node_id)
        .ok_or_else(|| RunFault::MissingEdge(node_id.to_string()))?;
    match edge {
        Edge::Static(target) => Ok(target.clone()),
        Edge::Conditional { router, targets } => {
            let label = router.route(state);
            let target = targets
                .get(label)
                .cloned()
                .ok_or_else(|| RunFault::UnmappedLabel {
                    node: node_id.to_string(),
                    label: label.to_string(),
                })?;
            logging::log_route(node_id, label, &target);
            Ok(target)
        }
    }
}
