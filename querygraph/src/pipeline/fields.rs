//! State field names written by the pipeline nodes. Each field has exactly one writer.

/// `FinancialQuery` written by `input_parsing`.
pub const PARSED_QUERY: &str = "parsed_query";
/// Raw ticker info keyed by ticker, written by `data_fetch`.
pub const FETCHED_DATA: &str = "fetched_data";
/// `Vec<MarketMetrics>` written by `data_normalization`.
pub const NORMALIZED_METRICS: &str = "normalized_metrics";
/// `Vec<String>` of document texts written by `retrieval`.
pub const RETRIEVED_DOCS: &str = "retrieved_docs";
/// `AnalysisResult` written by `reasoning`.
pub const ANALYSIS_RESULT: &str = "analysis_result";
/// Text returned to the caller, written by `response_generation`.
pub const FINAL_RESPONSE: &str = "final_response";
