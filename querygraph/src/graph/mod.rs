//! State graph: nodes, static and conditional edges, compile and invoke.
//!
//! Build a `StateGraph`, compile it into an immutable `CompiledStateGraph`, then run
//! it with an initial partial state. Nodes return partial updates that are merged
//! into the run's state; routers pick successors from a declared label set.

mod compile_error;
mod compiled;
mod edge;
pub mod logging;
mod node;
mod node_middleware;
mod router;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, RunOutcome, RunStatus};
pub use edge::{resolve_next, Edge, Target};
pub use node::{FnNode, Node};
pub use node_middleware::{NodeFuture, NodeInvoker, NodeMiddleware};
pub use router::{FnRouter, HaltLabel, HaltRouter, LabelRouter, RouteLabel, Router};
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
