//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds nodes, resolved edges and the entry node.
//! The executor runs one node at a time: execute, merge the partial update, resolve
//! the next node, repeat until END. A node error or panic halts the run immediately
//! and records the fault under `__fault__` in the last merged state.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::RunFault;
use crate::state::{PartialState, State, FAULT_FIELD};
use crate::stream::{StreamEvent, StreamMode};

use super::edge::{resolve_next, Edge, Target};
use super::logging;
use super::node_middleware::{NodeFuture, NodeInvoker, NodeMiddleware};
use super::{Node, RunContext};

/// How a run ended.
#[derive(Debug)]
pub enum RunStatus {
    /// The run reached END.
    Completed,
    /// A run-fatal fault stopped the run before END.
    Halted(RunFault),
}

/// Result of one run: the final merged state, how it ended, and the nodes executed.
#[derive(Debug)]
pub struct RunOutcome {
    /// Final state. On halt, the last merged state plus the `__fault__` field.
    pub state: State,
    pub status: RunStatus,
    /// Node ids in execution order.
    pub path: Vec<String>,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, RunStatus::Completed)
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.status, RunStatus::Halted(_))
    }

    pub fn fault(&self) -> Option<&RunFault> {
        match &self.status {
            RunStatus::Halted(fault) => Some(fault),
            RunStatus::Completed => None,
        }
    }

    /// Final state on completion, the fault on halt.
    pub fn into_result(self) -> Result<State, RunFault> {
        match self.status {
            RunStatus::Completed => Ok(self.state),
            RunStatus::Halted(fault) => Err(fault),
        }
    }
}

/// Compiled graph: immutable structure, shared freely across concurrent runs.
///
/// Created by `StateGraph::compile()`. Cloning is cheap (nodes and edges sit behind
/// `Arc`); each run owns its own `State`.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) nodes: Arc<HashMap<String, Arc<dyn Node>>>,
    pub(super) edges: Arc<HashMap<String, Edge>>,
    pub(super) entry: String,
    /// Optional node middleware; set when built with `with_middleware` or `compile_with_middleware`.
    pub(super) middleware: Option<Arc<dyn NodeMiddleware>>,
}

impl CompiledStateGraph {
    /// Entry node id.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Registered node ids, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort();
        ids
    }

    /// Outgoing edge of a node.
    pub fn edge(&self, node_id: &str) -> Option<&Edge> {
        self.edges.get(node_id)
    }

    /// Runs the graph from the entry node with `input` as the initial partial state.
    ///
    /// Always returns the final state; inspect `RunOutcome::status` (or call
    /// `into_result`) to tell completion from a halt.
    pub async fn invoke(&self, input: PartialState) -> RunOutcome {
        self.run_with(input, None).await
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// Per node, `Updates` comes before `Values`; the last event is always `Finished`.
    pub fn stream(
        &self,
        input: PartialState,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let mode_set: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let run_ctx = RunContext {
                stream_tx: Some(tx.clone()),
                stream_mode: mode_set,
            };
            let outcome = graph.run_with(input, Some(&run_ctx)).await;
            let _ = tx.send(StreamEvent::Finished(outcome)).await;
        });

        ReceiverStream::new(rx)
    }

    async fn run_with(&self, input: PartialState, run_ctx: Option<&RunContext>) -> RunOutcome {
        let mut state = State::from_partial(input);
        let mut path = Vec::new();
        logging::log_graph_start(&self.entry);

        let status = match self.run_loop(&mut state, &mut path, run_ctx).await {
            Ok(()) => {
                logging::log_graph_complete(path.len());
                RunStatus::Completed
            }
            Err(fault) => {
                logging::log_graph_error(&fault);
                state.merge(
                    PartialState::new().with(FAULT_FIELD, Value::String(fault.to_string())),
                );
                RunStatus::Halted(fault)
            }
        };

        RunOutcome {
            state,
            status,
            path,
        }
    }

    /// Run loop shared by invoke() and stream(): steps through nodes until END or a fault.
    async fn run_loop(
        &self,
        state: &mut State,
        path: &mut Vec<String>,
        run_ctx: Option<&RunContext>,
    ) -> Result<(), RunFault> {
        let mut current_id = self.entry.clone();
        loop {
            let node = self
                .nodes
                .get(&current_id)
                .cloned()
                .ok_or_else(|| RunFault::NodeNotFound(current_id.clone()))?;
            path.push(current_id.clone());
            debug_assert!(path.len() <= self.nodes.len(), "acyclic graph revisited a node");

            logging::log_node_start(&current_id);
            let update = self.execute(&current_id, node, state, run_ctx).await?;
            let written: Vec<&str> = update.keys().collect();
            logging::log_node_complete(&current_id, &written);

            if let Some(ctx) = run_ctx {
                if ctx.wants(StreamMode::Updates) {
                    if let Some(tx) = &ctx.stream_tx {
                        let _ = tx
                            .send(StreamEvent::Updates {
                                node_id: current_id.clone(),
                                update: update.clone(),
                            })
                            .await;
                    }
                }
            }

            state.merge(update);
            logging::log_state_update(&current_id, state.len(), state.has_error());

            if let Some(ctx) = run_ctx {
                if ctx.wants(StreamMode::Values) {
                    if let Some(tx) = &ctx.stream_tx {
                        let _ = tx.send(StreamEvent::Values(state.clone())).await;
                    }
                }
            }

            match resolve_next(&current_id, state, &self.edges)? {
                Target::End => return Ok(()),
                Target::Node(next) => current_id = next,
            }
        }
    }

    /// Executes one node (through middleware when set), turning errors and panics into faults.
    async fn execute(
        &self,
        node_id: &str,
        node: Arc<dyn Node>,
        state: &State,
        run_ctx: Option<&RunContext>,
    ) -> Result<PartialState, RunFault> {
        let result = match &self.middleware {
            Some(middleware) => {
                let run_ctx_owned = run_ctx.cloned();
                let inner: NodeInvoker = Box::new(move |s: State| -> NodeFuture {
                    Box::pin(async move {
                        match run_ctx_owned {
                            Some(ctx) => node.run_with_context(&s, &ctx).await,
                            None => node.run(&s).await,
                        }
                    })
                });
                AssertUnwindSafe(middleware.around_run(node_id, state.clone(), inner))
                    .catch_unwind()
                    .await
            }
            None => match run_ctx {
                Some(ctx) => {
                    AssertUnwindSafe(node.run_with_context(state, ctx))
                        .catch_unwind()
                        .await
                }
                None => AssertUnwindSafe(node.run(state)).catch_unwind().await,
            },
        };

        match result {
            Ok(Ok(update)) => Ok(update),
            Ok(Err(source)) => Err(RunFault::NodeFailed {
                node: node_id.to_string(),
                source,
            }),
            Err(panic) => Err(RunFault::NodePanicked {
                node: node_id.to_string(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
