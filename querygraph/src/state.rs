//! Run state: the single accumulator every node reads and every merge writes.
//!
//! `State` maps field names to JSON values. Nodes never return a full state; they
//! return a `PartialState` that is merged key by key (shallow overwrite). A merge
//! never removes a key, so anything written stays until a later update overwrites it.
//!
//! Two field names are reserved: [`ERROR_FIELD`] is the expected-failure signal that
//! halt routers inspect, and [`FAULT_FIELD`] is written only by the executor when a
//! run stops on a fault.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AgentError;
use crate::message::Message;

/// Conversational turns; opaque to the graph core.
pub const MESSAGES_FIELD: &str = "messages";

/// Expected-failure signal. Routers that choose to branch on failure read this field.
pub const ERROR_FIELD: &str = "error";

/// Written by the executor when a run halts on a run-fatal fault.
pub const FAULT_FIELD: &str = "__fault__";

/// Accumulated knowledge about one query's processing.
///
/// Keys iterate in sorted order so that logs and snapshots are deterministic.
///
/// **Interaction**: Passed by reference to `Node::run` and `Router::route`; mutated
/// only by `CompiledStateGraph` through [`State::merge`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    fields: BTreeMap<String, Value>,
}

impl State {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a state from a caller-provided partial update.
    pub fn from_partial(partial: PartialState) -> Self {
        let mut state = Self::new();
        state.merge(partial);
        state
    }

    /// Merges `update` into this state: every key in `update` overwrites, every other
    /// key is left untouched. No nested merge is attempted.
    pub fn merge(&mut self, update: PartialState) {
        for (key, value) in update.fields {
            self.fields.insert(key, value);
        }
    }

    /// Raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Typed value of a field. `Ok(None)` when the field is absent or null.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AgentError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `error` diagnostic. A non-empty string is returned as is; any other non-null
    /// value is rendered as JSON text. Null and empty strings count as unset.
    pub fn error(&self) -> Option<Cow<'_, str>> {
        match self.fields.get(ERROR_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(Cow::Borrowed(s.as_str())),
            Some(other) => Some(Cow::Owned(other.to_string())),
        }
    }

    /// True exactly when [`State::error`] returns a diagnostic.
    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    /// The fault text recorded by the executor, if the run halted.
    pub fn fault(&self) -> Option<&str> {
        self.fields.get(FAULT_FIELD).and_then(Value::as_str)
    }

    /// Conversation turns stored under `messages`; empty when absent.
    pub fn messages(&self) -> Result<Vec<Message>, AgentError> {
        Ok(self.get_as(MESSAGES_FIELD)?.unwrap_or_default())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

/// Pure form of [`State::merge`]: returns a new snapshot and leaves `current` untouched.
pub fn merge(current: &State, update: PartialState) -> State {
    let mut next = current.clone();
    next.merge(update);
    next
}

/// Subset of state fields a node wishes to change. Omitted fields are left untouched.
///
/// **Interaction**: Returned by `Node::run`; consumed by [`State::merge`]. Also the
/// input type of `CompiledStateGraph::invoke` (the caller's initial partial state).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialState {
    fields: BTreeMap<String, Value>,
}

impl PartialState {
    /// Empty update: the node has nothing to change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update carrying only the `error` field (the expected-failure path).
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().with(ERROR_FIELD, Value::String(message.into()))
    }

    /// Initial update for a run seeded with conversation turns.
    pub fn from_messages(messages: &[Message]) -> Result<Self, AgentError> {
        Self::new().with_as(MESSAGES_FIELD, messages)
    }

    /// Builder form of [`PartialState::insert`].
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`PartialState::insert_as`].
    pub fn with_as<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, AgentError> {
        self.insert_as(key, value)?;
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Serializes `value` and inserts it under `key`.
    pub fn insert_as<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), AgentError> {
        self.fields.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for PartialState {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PartialState {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
