//! Scripted LLM client for tests and offline runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

use super::{LlmClient, LlmResponse};

/// Mock LLM: returns scripted responses in order; the last one repeats.
///
/// Every call's messages are recorded so tests can assert on prompts. A mock built
/// with [`MockLlm::failing`] returns `AgentError::ExecutionFailed` on every call.
#[derive(Debug)]
pub struct MockLlm {
    responses: Vec<String>,
    failure: Option<String>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Mock answering with `responses[0]`, `responses[1]`, … and then the last one forever.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock that always answers `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new([content.into()])
    }

    /// Mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Vec::new(),
            failure: Some(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Messages passed to each invocation, in call order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let index = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| AgentError::ExecutionFailed("mock llm lock poisoned".into()))?;
            calls.push(messages.to_vec());
            calls.len() - 1
        };
        if let Some(message) = &self.failure {
            return Err(AgentError::ExecutionFailed(message.clone()));
        }
        let content = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_default();
        Ok(LlmResponse { content })
    }
}
