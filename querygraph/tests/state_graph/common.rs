//! Shared node builders for state graph tests.

use std::sync::Arc;

use querygraph::{FnNode, Node, PartialState};
use serde_json::Value;

/// Node that writes `key = value` and nothing else.
pub fn set(id: &'static str, key: &'static str, value: Value) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, move |_| {
        Ok(PartialState::new().with(key, value.clone()))
    }))
}

/// Node that writes nothing.
pub fn noop(id: &'static str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, |_| Ok(PartialState::new())))
}

/// Node that signals an expected failure through `error`.
pub fn fail(id: &'static str, message: &'static str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, move |_| Ok(PartialState::error(message))))
}
