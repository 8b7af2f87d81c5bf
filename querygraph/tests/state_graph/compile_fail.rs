//! StateGraph compile failure cases.

use std::sync::Arc;

use querygraph::graph::{FnRouter, HaltRouter};
use querygraph::{CompilationError, StateGraph, END, START};

use serde_json::json;

use crate::common::{noop, set};

/// **Scenario**: An edge to an unregistered node is rejected.
#[test]
fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: An entry that names an unregistered node is rejected.
#[test]
fn compile_fails_when_entry_is_unknown() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.set_entry_point("ghost");
    graph.add_edge("a", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::NodeNotFound("ghost".into()))
    );
}

/// **Scenario**: Registering one id twice is rejected instead of dropping the first node.
#[test]
fn compile_fails_when_node_id_is_registered_twice() {
    let mut graph = StateGraph::new();
    graph
        .add_node("parse", set("parse", "who", json!("first")))
        .add_node("parse", set("parse", "who", json!("second")));
    graph.add_edge(START, "parse").add_edge("parse", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateNode("parse".into()))
    );
}

/// **Scenario**: A repeated id is reported before entry checks.
#[test]
fn duplicate_node_is_checked_before_entry() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a")).add_node("a", noop("a"));
    graph.add_edge("a", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateNode("a".into()))
    );
}

/// **Scenario**: A graph without an entry is rejected.
#[test]
fn compile_fails_without_entry() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.add_edge("a", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingEntry));
}

/// **Scenario**: Two different entries are rejected; repeating the same one is fine.
#[test]
fn compile_fails_with_conflicting_entries() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a")).add_node("b", noop("b"));
    graph.set_entry_point("a").add_edge(START, "b");
    graph.add_edge("a", END).add_edge("b", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateEntry("b".into()))
    );

    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.set_entry_point("a").add_edge(START, "a").add_edge("a", END);
    assert!(graph.compile().is_ok());
}

/// **Scenario**: START and END cannot be node ids.
#[test]
fn compile_fails_on_reserved_name() {
    let mut graph = StateGraph::new();
    graph.add_node(END, noop("end"));
    graph.add_edge(START, END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::ReservedName(END.into()))
    );
}

/// **Scenario**: A node may not have two outgoing edges.
#[test]
fn compile_fails_on_duplicate_edge() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a")).add_node("b", noop("b"));
    graph.add_edge(START, "a");
    graph.add_edge("a", "b").add_edge("a", END).add_edge("b", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateEdge("a".into()))
    );
}

/// **Scenario**: A router label without a target is rejected.
#[test]
fn compile_fails_on_unmapped_label() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.add_edge(START, "a");
    graph.add_conditional_edges("a", Arc::new(HaltRouter), [("halt", END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::UnmappedLabel {
            node: "a".into(),
            label: "continue".into()
        })
    );
}

/// **Scenario**: A path map label the router never returns is rejected.
#[test]
fn compile_fails_on_undeclared_label() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.add_edge(START, "a");
    graph.add_conditional_edges(
        "a",
        Arc::new(FnRouter::new(&["done"], |_| "done")),
        [("done", END), ("maybe", END)],
    );
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::UndeclaredLabel {
            node: "a".into(),
            label: "maybe".into()
        })
    );
}

/// **Scenario**: A reachable node without an outgoing edge is rejected.
#[test]
fn compile_fails_on_missing_edge() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a")).add_node("b", noop("b"));
    graph.add_edge(START, "a").add_edge("a", "b");
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::MissingEdge("b".into()))
    );
}

/// **Scenario**: A cycle through a conditional edge is rejected with its path.
#[test]
fn compile_fails_on_cycle() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop("a"))
        .add_node("b", noop("b"))
        .add_node("c", noop("c"));
    graph.add_edge(START, "a").add_edge("a", "b");
    graph.add_conditional_edges(
        "b",
        Arc::new(HaltRouter),
        [("halt", END), ("continue", "c")],
    );
    graph.add_edge("c", "a");
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::CycleDetected("a -> b -> c -> a".into()))
    );
}

/// **Scenario**: A self-loop is a cycle.
#[test]
fn compile_fails_on_self_loop() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a"));
    graph.add_edge(START, "a").add_edge("a", "a");
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::CycleDetected("a -> a".into()))
    );
}

/// **Scenario**: Unreachable nodes are allowed.
#[test]
fn compile_allows_unreachable_nodes() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop("a")).add_node("island", noop("island"));
    graph.add_edge(START, "a").add_edge("a", END);
    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.node_ids(), vec!["a", "island"]);
}
