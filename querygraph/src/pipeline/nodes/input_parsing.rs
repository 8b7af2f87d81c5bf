//! Natural-language query → `FinancialQuery`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::pipeline::fields::PARSED_QUERY;
use crate::pipeline::model::FinancialQuery;
use crate::pipeline::INPUT_PARSING;
use crate::state::{PartialState, State};

use super::extract_json_object;

const PARSER_PROMPT: &str = r#"You are a financial assistant focused on the Indian stock market.
Extract tickers, intent, timeframe and language from the user's query and reply with a single JSON object:
{"tickers": [string], "intent": "market_data" | "comparative_analysis" | "general_chat" | "options_trading", "timeframe": string, "language": "english" | "hindi"}

Intent:
- options_trading: option chain, open interest, strike, premium, greeks, expiry, LTP calculator, support/resistance scenarios.
- market_data: price, volume or financials of specific stocks.
- comparative_analysis: comparing two or more companies.
- general_chat: greetings and non-financial questions.

Language: "hindi" when the query contains Hindi or Hinglish words, otherwise "english".

Tickers: add ".NS" for Indian stocks (RELIANCE.NS, TCS.NS), use NIFTY or BANKNIFTY for index options, standard symbols for US stocks (AAPL, MSFT), and [] for general questions.
Timeframe: e.g. "1y", "ytd", "1mo"; use "1y" when unspecified.
Reply with JSON only."#;

/// Asks the LLM to structure the last message. Any failure (no message, LLM error,
/// unparseable reply) is written to `error` as `Failed to parse input: …`.
pub struct InputParsingNode {
    llm: Arc<dyn LlmClient>,
}

impl InputParsingNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn parse(&self, state: &State) -> Result<FinancialQuery, String> {
        let messages = state.messages().map_err(|e| e.to_string())?;
        let text = messages
            .last()
            .map(|m| m.content().to_string())
            .ok_or_else(|| "no messages in state".to_string())?;
        let reply = self
            .llm
            .invoke(&[Message::system(PARSER_PROMPT), Message::user(text.clone())])
            .await
            .map_err(|e| e.to_string())?;
        let mut query: FinancialQuery =
            serde_json::from_str(extract_json_object(&reply.content)).map_err(|e| e.to_string())?;
        query.original_query = text;
        Ok(query)
    }
}

#[async_trait]
impl Node for InputParsingNode {
    fn id(&self) -> &str {
        INPUT_PARSING
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        match self.parse(state).await {
            Ok(query) => {
                tracing::debug!(intent = %query.intent, tickers = ?query.tickers, "parsed query");
                PartialState::new().with_as(PARSED_QUERY, &query)
            }
            Err(reason) => {
                tracing::debug!(%reason, "input parsing failed");
                Ok(PartialState::error(format!("Failed to parse input: {}", reason)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::pipeline::model::QueryIntent;
    use crate::state::ERROR_FIELD;

    fn state_with(text: &str) -> State {
        State::from_partial(PartialState::from_messages(&[Message::user(text)]).unwrap())
    }

    /// **Scenario**: A fenced JSON reply becomes parsed_query with the user's text.
    #[tokio::test]
    async fn parses_fenced_reply() {
        let llm = Arc::new(MockLlm::with_content(
            "```json\n{\"tickers\": [\"AAPL\", \"MSFT\"], \"intent\": \"comparative_analysis\"}\n```",
        ));
        let node = InputParsingNode::new(llm.clone());
        let out = node.run(&state_with("Compare Apple and Microsoft")).await.unwrap();
        let state = State::from_partial(out);
        let q: FinancialQuery = state.get_as(PARSED_QUERY).unwrap().unwrap();
        assert_eq!(q.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(q.intent, QueryIntent::ComparativeAnalysis);
        assert_eq!(q.original_query, "Compare Apple and Microsoft");
        assert_eq!(q.timeframe, "1y");
        assert_eq!(q.language, "english");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][1], Message::user("Compare Apple and Microsoft"));
    }

    /// **Scenario**: A non-JSON reply sets error and no parsed_query.
    #[tokio::test]
    async fn garbage_reply_sets_error() {
        let node = InputParsingNode::new(Arc::new(MockLlm::with_content("I am not JSON")));
        let out = node.run(&state_with("hello")).await.unwrap();
        assert!(!out.contains(PARSED_QUERY));
        let err = out.get(ERROR_FIELD).and_then(|v| v.as_str()).unwrap();
        assert!(err.starts_with("Failed to parse input: "));
    }

    /// **Scenario**: An LLM failure is an expected failure, not a fault.
    #[tokio::test]
    async fn llm_failure_sets_error() {
        let node = InputParsingNode::new(Arc::new(MockLlm::failing("rate limited")));
        let out = node.run(&state_with("hello")).await.unwrap();
        let err = out.get(ERROR_FIELD).and_then(|v| v.as_str()).unwrap();
        assert!(err.contains("rate limited"));
    }

    /// **Scenario**: No messages at all sets error.
    #[tokio::test]
    async fn empty_messages_sets_error() {
        let node = InputParsingNode::new(Arc::new(MockLlm::with_content("{}")));
        let out = node.run(&State::new()).await.unwrap();
        assert!(out.contains(ERROR_FIELD));
    }
}
