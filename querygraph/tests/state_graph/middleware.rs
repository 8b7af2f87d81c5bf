//! Node middleware attached through the builder.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use querygraph::graph::{NodeInvoker, NodeMiddleware};
use querygraph::{AgentError, PartialState, State, StateGraph, END, START};
use serde_json::json;

use crate::common::set;

/// Records node ids and tags every update with `wrapped = true`.
#[derive(Default)]
struct Tagging {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware for Tagging {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeInvoker,
    ) -> Result<PartialState, AgentError> {
        self.seen.lock().unwrap().push(node_id.to_string());
        let update = inner(state).await?;
        Ok(update.with("wrapped", json!(true)))
    }
}

fn graph() -> StateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", set("a", "a", json!(1)))
        .add_node("b", set("b", "b", json!(2)));
    graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
    graph
}

/// **Scenario**: compile_with_middleware wraps every node in run order.
#[tokio::test]
async fn compile_with_middleware_wraps_nodes() {
    let mw = Arc::new(Tagging::default());
    let compiled = graph().compile_with_middleware(mw.clone()).unwrap();
    let outcome = compiled.invoke(PartialState::new()).await;
    assert_eq!(*mw.seen.lock().unwrap(), vec!["a", "b"]);
    assert_eq!(outcome.state.get("wrapped"), Some(&json!(true)));
    assert_eq!(outcome.state.get("b"), Some(&json!(2)));
}

/// **Scenario**: with_middleware(..).compile() carries the middleware.
#[tokio::test]
async fn with_middleware_then_compile() {
    let mw = Arc::new(Tagging::default());
    let compiled = graph().with_middleware(mw.clone()).compile().unwrap();
    compiled.invoke(PartialState::new()).await;
    assert_eq!(mw.seen.lock().unwrap().len(), 2);
}
