//! The eight pipeline nodes.

mod data_fetch;
mod data_normalization;
mod embedding;
mod input_parsing;
mod query_planner;
mod reasoning;
mod response_generation;
mod retrieval;

pub use data_fetch::DataFetchNode;
pub use data_normalization::DataNormalizationNode;
pub use embedding::EmbeddingNode;
pub use input_parsing::InputParsingNode;
pub use query_planner::QueryPlannerNode;
pub use reasoning::ReasoningNode;
pub use response_generation::ResponseGenerationNode;
pub use retrieval::RetrievalNode;

/// Returns the JSON object inside an LLM reply, tolerating ```json fences and prose
/// around it.
pub(crate) fn extract_json_object(reply: &str) -> &str {
    let trimmed = reply.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Fenced and bare JSON both yield the object text.
    #[test]
    fn extract_json_object_strips_fences() {
        assert_eq!(extract_json_object("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json_object("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(extract_json_object("Sure: {\"a\": {\"b\": 2}} done"), "{\"a\": {\"b\": 2}}");
        assert_eq!(extract_json_object("no json"), "no json");
    }
}
