//! Conversation message type stored under the `messages` state field.
//!
//! The graph core never inspects messages; pipeline nodes read the last user turn and
//! LLM clients convert them to provider requests.

use serde::{Deserialize, Deserializer, Serialize};

/// One conversational turn.
///
/// Serializes as `{"role": .., "content": ..}`. Deserialization also accepts a bare
/// string, read as a user turn, so callers may seed `messages` with `["hi"]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

#[derive(Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
enum Turn {
    System(String),
    User(String),
    Assistant(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Turn(Turn),
    Text(String),
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Turn(Turn::System(s)) => Self::System(s),
            Wire::Turn(Turn::User(s)) => Self::User(s),
            Wire::Turn(Turn::Assistant(s)) => Self::Assistant(s),
            Wire::Text(s) => Self::User(s),
        })
    }
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// Text of the turn regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) | Self::Assistant(s) => s,
        }
    }
}
