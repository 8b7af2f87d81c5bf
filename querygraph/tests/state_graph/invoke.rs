//! StateGraph invoke: merge, routing, explicit halting and termination.

use std::sync::Arc;

use querygraph::graph::{FnRouter, HaltRouter};
use querygraph::{CompiledStateGraph, PartialState, RunFault, StateGraph, END, START};
use serde_json::json;

use crate::common::{fail, noop, set};

/// a ─halt/continue─▶ b ─▶ c ─▶ END
fn halting_chain(a: Arc<dyn querygraph::Node>) -> CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", a)
        .add_node("b", set("b", "b_done", json!(true)))
        .add_node("c", set("c", "c_done", json!(true)));
    graph.add_edge(START, "a");
    graph.add_conditional_edges("a", Arc::new(HaltRouter), [("halt", END), ("continue", "b")]);
    graph.add_edge("b", "c").add_edge("c", END);
    graph.compile().unwrap()
}

/// **Scenario**: Updates merge key by key; untouched input keys survive.
#[tokio::test]
async fn invoke_merges_partial_updates() {
    let graph = halting_chain(set("a", "a_done", json!(1)));
    let outcome = graph
        .invoke(PartialState::new().with("input", json!("kept")))
        .await;
    assert!(outcome.is_completed());
    assert_eq!(outcome.path, vec!["a", "b", "c"]);
    assert_eq!(outcome.state.get("input"), Some(&json!("kept")));
    assert_eq!(outcome.state.get("a_done"), Some(&json!(1)));
    assert_eq!(outcome.state.get("c_done"), Some(&json!(true)));
}

/// **Scenario**: error written by the entry node ends the run right after it.
#[tokio::test]
async fn error_after_entry_short_circuits() {
    let graph = halting_chain(fail("a", "unparseable"));
    let outcome = graph.invoke(PartialState::new()).await;
    assert!(outcome.is_completed());
    assert_eq!(outcome.path, vec!["a"]);
    assert_eq!(outcome.state.error().as_deref(), Some("unparseable"));
    assert!(!outcome.state.contains("b_done"));
}

/// **Scenario**: An empty-string error does not halt.
#[tokio::test]
async fn empty_error_does_not_halt() {
    let graph = halting_chain(set("a", "error", json!("")));
    let outcome = graph.invoke(PartialState::new()).await;
    assert_eq!(outcome.path, vec!["a", "b", "c"]);
}

/// **Scenario**: An error present in the input halts at the first halt router.
#[tokio::test]
async fn error_in_input_halts_at_router() {
    let graph = halting_chain(noop("a"));
    let outcome = graph.invoke(PartialState::error("preset")).await;
    assert_eq!(outcome.path, vec!["a"]);
}

/// **Scenario**: A node error stops the run and records the fault; into_result fails.
#[tokio::test]
async fn node_error_becomes_fault() {
    let boom = Arc::new(querygraph::FnNode::new("b", |_| {
        Err(querygraph::AgentError::ExecutionFailed("disk full".into()))
    }));
    let mut graph = StateGraph::new();
    graph
        .add_node("a", set("a", "a_done", json!(true)))
        .add_node("b", boom);
    graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
    let outcome = graph.compile().unwrap().invoke(PartialState::new()).await;

    assert!(outcome.is_halted());
    assert_eq!(outcome.path, vec!["a", "b"]);
    assert_eq!(outcome.state.get("a_done"), Some(&json!(true)));
    assert!(outcome.state.fault().unwrap().contains("disk full"));
    match outcome.into_result() {
        Err(RunFault::NodeFailed { node, .. }) => assert_eq!(node, "b"),
        other => panic!("expected NodeFailed, got {:?}", other),
    }
}

/// **Scenario**: A router returning a label outside its declared set halts the run.
#[tokio::test]
async fn undeclared_runtime_label_halts() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.add_edge(START, "a");
    graph.add_conditional_edges(
        "a",
        Arc::new(FnRouter::new(&["ok"], |_| "surprise")),
        [("ok", END)],
    );
    let outcome = graph.compile().unwrap().invoke(PartialState::new()).await;
    match outcome.fault() {
        Some(RunFault::UnmappedLabel { node, label }) => {
            assert_eq!(node, "a");
            assert_eq!(label, "surprise");
        }
        other => panic!("expected UnmappedLabel, got {:?}", other),
    }
}

/// **Scenario**: Every run of a valid graph visits at most as many nodes as it has.
#[tokio::test]
async fn runs_terminate_within_node_count() {
    let graph = halting_chain(noop("a"));
    for input in [PartialState::new(), PartialState::error("x")] {
        let outcome = graph.invoke(input).await;
        assert!(outcome.path.len() <= graph.node_ids().len());
    }
}
