//! State graph builder: nodes, static edges, conditional edges, entry point.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` (use `START` for the
//! entry and `END` for the terminal) and `add_conditional_edges(from, router, path_map)`,
//! then `compile` to get an immutable `CompiledStateGraph`. Compilation rejects every
//! routing defect that can be seen statically, including cycles.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::edge::{Edge, Target};
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::router::Router;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as a target in `add_edge(last_node_id, END)` or in a
/// conditional path map.
pub const END: &str = "__end__";

/// Edge as declared, before target ids are checked.
enum PendingEdge {
    Static(String),
    Conditional {
        router: Arc<dyn Router>,
        path_map: HashMap<String, String>,
    },
}

/// State graph: nodes plus one outgoing edge per node.
///
/// **Interaction**: Accepts `Arc<dyn Node>` and `Arc<dyn Router>`; produces
/// `CompiledStateGraph`. Middleware is optional and travels into the compiled graph.
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    /// Outgoing edges in declaration order; duplicates are rejected at compile time.
    edges: Vec<(String, PendingEdge)>,
    /// Every entry declaration, so that conflicting ones can be reported.
    entries: Vec<String>,
    /// Ids passed to `add_node` more than once, in call order.
    duplicate_nodes: Vec<String>,
    middleware: Option<Arc<dyn NodeMiddleware>>,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            entries: Vec::new(),
            duplicate_nodes: Vec::new(),
            middleware: None,
        }
    }

    /// Attaches node middleware; `compile()` carries it into the compiled graph.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Adds a node; id must be unique. A repeated id is reported by `compile()` as
    /// `DuplicateNode`.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            self.duplicate_nodes.push(id);
        } else {
            self.nodes.insert(id, node);
        }
        self
    }

    /// Sets the entry node. Equivalent to `add_edge(START, id)`.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.entries.push(id.into());
        self
    }

    /// Adds a static edge from `from_id` to `to_id`.
    ///
    /// `from_id == START` declares the entry node; `to_id == END` ends the run after
    /// `from_id`. A node may have only one outgoing edge.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        let from = from_id.into();
        let to = to_id.into();
        if from == START {
            self.entries.push(to);
        } else {
            self.edges.push((from, PendingEdge::Static(to)));
        }
        self
    }

    /// Adds a conditional edge: after `from_id`, `router` picks a label and `path_map`
    /// maps it to the next node id (or `END`).
    ///
    /// Every label the router declares must appear in `path_map`, and `path_map` may
    /// contain no other labels; both are checked by `compile()`.
    pub fn add_conditional_edges<I, K, V>(
        &mut self,
        from_id: impl Into<String>,
        router: Arc<dyn Router>,
        path_map: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let path_map = path_map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.edges.push((
            from_id.into(),
            PendingEdge::Conditional { router, path_map },
        ));
        self
    }

    /// Builds the executable graph after validating it.
    ///
    /// Returns `CompilationError` for reserved or repeated node ids, a missing or conflicting entry,
    /// unknown node ids, duplicate outgoing edges, router labels without targets (or
    /// targets without labels), reachable nodes without an outgoing edge, and cycles.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        let middleware = self.middleware.clone();
        self.compile_internal(middleware)
    }

    /// Builds the executable graph with node middleware wrapping every node call.
    pub fn compile_with_middleware(
        self,
        middleware: Arc<dyn NodeMiddleware>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(Some(middleware))
    }

    fn compile_internal(
        self,
        middleware: Option<Arc<dyn NodeMiddleware>>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        let StateGraph {
            nodes,
            edges: pending_edges,
            entries,
            duplicate_nodes,
            ..
        } = self;

        let mut ids: Vec<&String> = nodes.keys().collect();
        ids.sort();
        if let Some(reserved) = ids.iter().find(|id| id.as_str() == START || id.as_str() == END) {
            return Err(CompilationError::ReservedName((*reserved).clone()));
        }
        if let Some(id) = duplicate_nodes.into_iter().next() {
            return Err(CompilationError::DuplicateNode(id));
        }

        let entry = match entries.first() {
            None => return Err(CompilationError::MissingEntry),
            Some(first) => first.clone(),
        };
        if let Some(other) = entries.iter().find(|e| **e != entry) {
            return Err(CompilationError::DuplicateEntry(other.clone()));
        }
        if !nodes.contains_key(&entry) {
            return Err(CompilationError::NodeNotFound(entry));
        }

        let mut edges: HashMap<String, Edge> = HashMap::new();
        for (from, pending) in pending_edges {
            if !nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            if edges.contains_key(&from) {
                return Err(CompilationError::DuplicateEdge(from));
            }
            let edge = match pending {
                PendingEdge::Static(to) => Edge::Static(resolve_target(&nodes, to)?),
                PendingEdge::Conditional { router, path_map } => {
                    let declared = router.labels();
                    if let Some(label) = declared.iter().find(|l| !path_map.contains_key(**l)) {
                        return Err(CompilationError::UnmappedLabel {
                            node: from,
                            label: label.to_string(),
                        });
                    }
                    let mut labels: Vec<&String> = path_map.keys().collect();
                    labels.sort();
                    if let Some(extra) = labels
                        .iter()
                        .find(|l| !declared.iter().any(|d| *d == l.as_str()))
                    {
                        return Err(CompilationError::UndeclaredLabel {
                            node: from,
                            label: (*extra).clone(),
                        });
                    }
                    let mut targets = HashMap::new();
                    for (label, to) in path_map {
                        targets.insert(label, resolve_target(&nodes, to)?);
                    }
                    Edge::Conditional { router, targets }
                }
            };
            edges.insert(from, edge);
        }

        let mut visited = HashSet::new();
        let mut on_path = Vec::new();
        visit(&entry, &edges, &mut on_path, &mut visited)?;

        let mut unreachable: Vec<&String> = nodes
            .keys()
            .filter(|id| !visited.contains(id.as_str()))
            .collect();
        unreachable.sort();
        for id in unreachable {
            tracing::warn!(node_id = %id, "node is not reachable from the entry");
        }

        Ok(CompiledStateGraph {
            nodes: Arc::new(nodes),
            edges: Arc::new(edges),
            entry,
            middleware,
        })
    }
}

fn resolve_target(
    nodes: &HashMap<String, Arc<dyn Node>>,
    id: String,
) -> Result<Target, CompilationError> {
    if id == END {
        Ok(Target::End)
    } else if nodes.contains_key(&id) {
        Ok(Target::Node(id))
    } else {
        Err(CompilationError::NodeNotFound(id))
    }
}

/// Depth-first walk from `node`: every reachable node must have an outgoing edge and
/// no edge may point to a node already on the current path.
fn visit(
    node: &str,
    edges: &HashMap<String, Edge>,
    on_path: &mut Vec<String>,
    visited: &mut HashSet<String>,
) -> Result<(), CompilationError> {
    let edge = edges
        .get(node)
        .ok_or_else(|| CompilationError::MissingEdge(node.to_string()))?;
    on_path.push(node.to_string());
    for target in edge.targets() {
        let next = match target {
            Target::End => continue,
            Target::Node(next) => next,
        };
        if on_path.iter().any(|n| n == next) {
            let mut cycle = on_path.clone();
            cycle.push(next.clone());
            return Err(CompilationError::CycleDetected(cycle.join(" -> ")));
        }
        if !visited.contains(next) {
            visit(next, edges, on_path, visited)?;
        }
    }
    on_path.pop();
    visited.insert(node.to_string());
    Ok(())
}
