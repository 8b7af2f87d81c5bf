//! Final response: raw analysis for chat, a markdown report otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::pipeline::fields::{ANALYSIS_RESULT, FINAL_RESPONSE, NORMALIZED_METRICS, PARSED_QUERY};
use crate::pipeline::model::{AnalysisResult, FinancialInsight, FinancialQuery, QueryIntent};
use crate::pipeline::RESPONSE_GENERATION;
use crate::state::{PartialState, State, ERROR_FIELD};

use super::extract_json_object;

const REPORT_PROMPT: &str = r#"Turn the analysis and metrics below into a structured report.
Reply with a single JSON object:
{"executive_summary": string, "key_metrics": [{"ticker": string, "price": number|null, "market_cap": number|null, "pe_ratio": number|null, "eps": number|null, "volume": integer|null, "currency": string, "last_updated": string}], "comparative_analysis": string|null, "risk_factors": [string], "final_insight": string, "disclaimer": string}
Fill key_metrics from the provided metrics data."#;

/// Fallback when no analysis exists.
pub const NO_ANALYSIS: &str = "I could not generate an analysis.";

pub struct ResponseGenerationNode {
    llm: Arc<dyn LlmClient>,
}

impl ResponseGenerationNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn report(&self, analysis: &AnalysisResult, metrics: &Value) -> Result<String, String> {
        let content = format!(
            "Analysis:\n{}\n\nMetrics:\n{}",
            analysis.text,
            serde_json::to_string_pretty(metrics).map_err(|e| e.to_string())?
        );
        let reply = self
            .llm
            .invoke(&[Message::system(REPORT_PROMPT), Message::user(content)])
            .await
            .map_err(|e| e.to_string())?;
        let insight: FinancialInsight =
            serde_json::from_str(extract_json_object(&reply.content)).map_err(|e| e.to_string())?;
        Ok(insight.to_markdown())
    }
}

#[async_trait]
impl Node for ResponseGenerationNode {
    fn id(&self) -> &str {
        RESPONSE_GENERATION
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        let analysis = match state.get_as::<AnalysisResult>(ANALYSIS_RESULT)? {
            Some(a) => a,
            None => return Ok(PartialState::new().with(FINAL_RESPONSE, Value::from(NO_ANALYSIS))),
        };

        let intent = match state.get_as::<FinancialQuery>(PARSED_QUERY)? {
            Some(query) => Some(query.intent),
            None => analysis.intent,
        };
        if intent == Some(QueryIntent::GeneralChat) {
            return Ok(PartialState::new().with(FINAL_RESPONSE, Value::String(analysis.text)));
        }

        let metrics = state
            .get(NORMALIZED_METRICS)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        match self.report(&analysis, &metrics).await {
            Ok(markdown) => Ok(PartialState::new().with(FINAL_RESPONSE, Value::String(markdown))),
            Err(e) => {
                tracing::warn!(error = %e, "report generation failed");
                Ok(PartialState::new()
                    .with(
                        FINAL_RESPONSE,
                        Value::String(format!("Error formatting response: {}", e)),
                    )
                    .with(ERROR_FIELD, Value::String(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use serde_json::json;

    fn state(intent: &str) -> State {
        State::from_partial(
            PartialState::new()
                .with(
                    PARSED_QUERY,
                    json!({"tickers": ["AAPL"], "intent": intent, "original_query": "q"}),
                )
                .with(ANALYSIS_RESULT, json!({"text": "analysis text"}))
                .with(
                    NORMALIZED_METRICS,
                    json!([{"ticker": "AAPL", "price": 190.0, "last_updated": "t"}]),
                ),
        )
    }

    /// **Scenario**: general_chat returns the analysis text without calling the LLM.
    #[tokio::test]
    async fn general_chat_passes_text_through() {
        let llm = Arc::new(MockLlm::with_content("unused"));
        let out = ResponseGenerationNode::new(llm.clone())
            .run(&state("general_chat"))
            .await
            .unwrap();
        assert_eq!(out.get(FINAL_RESPONSE), Some(&json!("analysis text")));
        assert_eq!(llm.call_count(), 0);
    }

    /// **Scenario**: Data intents render the structured insight as markdown.
    #[tokio::test]
    async fn market_data_renders_report() {
        let insight = json!({
            "executive_summary": "Solid.",
            "key_metrics": [{"ticker": "AAPL", "price": 190.0, "last_updated": "t"}],
            "comparative_analysis": null,
            "risk_factors": ["Valuation"],
            "final_insight": "Hold.",
            "disclaimer": "Not advice."
        });
        let llm = Arc::new(MockLlm::with_content(format!("```json\n{}\n```", insight)));
        let out = ResponseGenerationNode::new(llm).run(&state("market_data")).await.unwrap();
        let text = out.get(FINAL_RESPONSE).and_then(|v| v.as_str()).unwrap();
        assert!(text.starts_with("# Financial Report"));
        assert!(text.contains("| AAPL | 190 |"));
        assert!(text.contains("- Valuation"));
        assert!(!out.contains(ERROR_FIELD));
    }

    /// **Scenario**: An unparseable report sets both final_response and error.
    #[tokio::test]
    async fn bad_report_sets_error() {
        let llm = Arc::new(MockLlm::with_content("not json"));
        let out = ResponseGenerationNode::new(llm).run(&state("comparative_analysis")).await.unwrap();
        let text = out.get(FINAL_RESPONSE).and_then(|v| v.as_str()).unwrap();
        assert!(text.starts_with("Error formatting response: "));
        assert!(out.contains(ERROR_FIELD));
    }

    /// **Scenario**: No analysis gives the fixed fallback text.
    #[tokio::test]
    async fn missing_analysis_falls_back() {
        let llm = Arc::new(MockLlm::with_content("unused"));
        let out = ResponseGenerationNode::new(llm).run(&State::new()).await.unwrap();
        assert_eq!(out.get(FINAL_RESPONSE), Some(&json!(NO_ANALYSIS)));
    }
}
