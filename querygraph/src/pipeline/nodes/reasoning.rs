//! Analysis of the query against fetched metrics and retrieved context.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::pipeline::fields::{ANALYSIS_RESULT, NORMALIZED_METRICS, PARSED_QUERY, RETRIEVED_DOCS};
use crate::pipeline::model::{AnalysisResult, FinancialQuery, MarketMetrics};
use crate::pipeline::REASONING;
use crate::state::{PartialState, State};

const ANALYST_RULES: &str = "Rules:
- Compare profitability with net profit margin or operating margin, never with EPS.
- Read P/E as a valuation premium reflecting growth expectations, not as profitability.
- Market cap is total company value; volume indicates liquidity.
- For comparisons weigh revenue growth, margins, valuation and revenue diversification.
- For Indian stocks use NSE/BSE context, INR and SEBI/RBI policy where relevant.
- For general_chat answer helpfully from general knowledge.
Keep the analysis objective, professional and technically accurate.";

/// Produces the free-text analysis. An LLM error here is a run fault.
pub struct ReasoningNode {
    llm: Arc<dyn LlmClient>,
}

impl ReasoningNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn prompt(query: &FinancialQuery, metrics: &[MarketMetrics], docs: &[String]) -> String {
        let mut context = String::new();
        if !metrics.is_empty() {
            context.push_str("Current Market Data:\n");
            for m in metrics {
                context.push_str(&m.summary());
                context.push('\n');
            }
        }
        if !docs.is_empty() {
            context.push_str("Historical Context:\n");
            context.push_str(&docs.join("\n\n"));
            context.push('\n');
        }
        format!(
            "You are a professional financial analyst specialising in the Indian stock market.\n\nUser Query: \"{}\"\nIntent: {}\n\n{}\n{}",
            query.original_query, query.intent, context, ANALYST_RULES
        )
    }
}

#[async_trait]
impl Node for ReasoningNode {
    fn id(&self) -> &str {
        REASONING
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        let Some(query) = state.get_as::<FinancialQuery>(PARSED_QUERY)? else {
            return Ok(PartialState::error("No query to analyze."));
        };
        let metrics: Vec<MarketMetrics> = state.get_as(NORMALIZED_METRICS)?.unwrap_or_default();
        let docs: Vec<String> = state.get_as(RETRIEVED_DOCS)?.unwrap_or_default();

        let prompt = Self::prompt(&query, &metrics, &docs);
        let response = self.llm.invoke(&[Message::user(prompt)]).await?;

        let analysis = AnalysisResult {
            text: response.content,
            intent: Some(query.intent),
            language: Some(query.language),
        };
        PartialState::new().with_as(ANALYSIS_RESULT, &analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::pipeline::model::QueryIntent;
    use crate::state::ERROR_FIELD;
    use serde_json::json;

    /// **Scenario**: Analysis text comes from the LLM; intent and language are carried.
    #[tokio::test]
    async fn writes_analysis_result() {
        let llm = Arc::new(MockLlm::with_content("AAPL looks fairly valued."));
        let state = State::from_partial(
            PartialState::new()
                .with(
                    PARSED_QUERY,
                    json!({"tickers": ["AAPL"], "intent": "market_data", "original_query": "How is AAPL?", "language": "hindi"}),
                )
                .with(
                    NORMALIZED_METRICS,
                    json!([{"ticker": "AAPL", "price": 190.0, "profit_margin": 0.25, "last_updated": "t"}]),
                )
                .with(RETRIEVED_DOCS, json!(["Financial Metrics for AAPL on t"])),
        );
        let out = ReasoningNode::new(llm.clone()).run(&state).await.unwrap();
        let analysis: AnalysisResult =
            State::from_partial(out).get_as(ANALYSIS_RESULT).unwrap().unwrap();
        assert_eq!(analysis.text, "AAPL looks fairly valued.");
        assert_eq!(analysis.intent, Some(QueryIntent::MarketData));
        assert_eq!(analysis.language.as_deref(), Some("hindi"));

        let prompt = llm.calls()[0][0].content().to_string();
        assert!(prompt.contains("User Query: \"How is AAPL?\""));
        assert!(prompt.contains("Current Market Data:\nTicker: AAPL"));
        assert!(prompt.contains("Profit Margin: 25%"));
        assert!(prompt.contains("Historical Context:\nFinancial Metrics for AAPL on t"));
    }

    /// **Scenario**: Without data the prompt has no context sections.
    #[tokio::test]
    async fn general_chat_prompt_has_no_context() {
        let llm = Arc::new(MockLlm::with_content("Hello!"));
        let state = State::from_partial(PartialState::new().with(
            PARSED_QUERY,
            json!({"tickers": [], "intent": "general_chat", "original_query": "hi"}),
        ));
        ReasoningNode::new(llm.clone()).run(&state).await.unwrap();
        let prompt = llm.calls()[0][0].content().to_string();
        assert!(!prompt.contains("Current Market Data"));
        assert!(!prompt.contains("Historical Context"));
    }

    /// **Scenario**: Missing parsed_query sets error without calling the LLM.
    #[tokio::test]
    async fn missing_query_sets_error() {
        let llm = Arc::new(MockLlm::with_content("unused"));
        let out = ReasoningNode::new(llm.clone()).run(&State::new()).await.unwrap();
        assert_eq!(out.get(ERROR_FIELD), Some(&json!("No query to analyze.")));
        assert_eq!(llm.call_count(), 0);
    }

    /// **Scenario**: An LLM error propagates as a node error.
    #[tokio::test]
    async fn llm_error_is_node_error() {
        let state = State::from_partial(PartialState::new().with(
            PARSED_QUERY,
            json!({"tickers": [], "intent": "general_chat", "original_query": "hi"}),
        ));
        let result = ReasoningNode::new(Arc::new(MockLlm::failing("down"))).run(&state).await;
        assert!(result.is_err());
    }
}
