//! LLM client abstraction used by the parsing, reasoning and response nodes.
//!
//! Nodes depend on a callable that turns a message list into assistant text; this
//! module defines the trait, a scripted mock and (feature `openai`) a real client.

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

/// Response from an LLM completion: assistant message text.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; pipeline nodes parse `content`
/// as JSON (input parsing, structured report) or keep it as text (reasoning).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
}

/// LLM client: given messages, returns assistant text.
///
/// Implementations: `MockLlm` (scripted responses), `ChatOpenAI` (real API, feature `openai`).
/// Transient-failure retries, if any, belong inside the implementation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}
