//! Domain models carried in pipeline state.
//!
//! All models round-trip through `serde_json::Value` so nodes store them with
//! `PartialState::insert_as` and read them back with `State::get_as`.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the user is asking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    MarketData,
    ComparativeAnalysis,
    GeneralChat,
    OptionsTrading,
}

impl QueryIntent {
    /// Intents answered from fetched market data; the others go straight to reasoning.
    pub fn needs_external_data(&self) -> bool {
        matches!(self, QueryIntent::MarketData | QueryIntent::ComparativeAnalysis)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryIntent::MarketData => "market_data",
            QueryIntent::ComparativeAnalysis => "comparative_analysis",
            QueryIntent::GeneralChat => "general_chat",
            QueryIntent::OptionsTrading => "options_trading",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_timeframe() -> String {
    "1y".to_string()
}

fn default_language() -> String {
    "english".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Structured form of the user's request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialQuery {
    /// Ticker symbols, e.g. `AAPL`, `TCS.NS`, `NIFTY`. Empty for general questions.
    #[serde(default)]
    pub tickers: Vec<String>,
    pub intent: QueryIntent,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// The user's text, verbatim.
    #[serde(default)]
    pub original_query: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Standardized metrics for one ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    pub ticker: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// RFC 3339 timestamp of normalization.
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub profit_margin: Option<f64>,
    #[serde(default)]
    pub operating_margin: Option<f64>,
}

impl MarketMetrics {
    /// Maps a raw ticker info object (Yahoo-style keys) to metrics.
    ///
    /// Price comes from `currentPrice`, falling back to `regularMarketPrice`; currency
    /// defaults to USD.
    pub fn from_ticker_info(ticker: &str, info: &Value, now: DateTime<Utc>) -> Self {
        let number = |key: &str| info.get(key).and_then(Value::as_f64);
        let price = number("currentPrice")
            .filter(|p| *p != 0.0)
            .or_else(|| number("regularMarketPrice"));
        let volume = info.get("volume").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        });
        Self {
            ticker: ticker.to_string(),
            price,
            market_cap: number("marketCap"),
            pe_ratio: number("trailingPE"),
            eps: number("trailingEps"),
            volume,
            currency: info
                .get("currency")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(default_currency),
            last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            profit_margin: number("profitMargins"),
            operating_margin: number("operatingMargins"),
        }
    }

    /// Text stored in the vector store for this ticker.
    pub fn document_text(&self) -> String {
        format!(
            "Financial Metrics for {} on {}:\nPrice: {} {}\nMarket Cap: {}\nPE Ratio: {}\nVolume: {}",
            self.ticker,
            self.last_updated,
            opt(self.price),
            self.currency,
            opt(self.market_cap),
            opt(self.pe_ratio),
            opt(self.volume),
        )
    }

    /// Multi-line summary handed to the reasoning prompt.
    pub fn summary(&self) -> String {
        format!(
            "Ticker: {}\nPrice: {} {}\nMarket Cap: {}\nPE Ratio: {}\nEPS: {}\nVolume: {}\nProfit Margin: {}%\nOperating Margin: {}%\n",
            self.ticker,
            opt(self.price),
            self.currency,
            opt(self.market_cap),
            opt(self.pe_ratio),
            opt(self.eps),
            opt(self.volume),
            opt(self.profit_margin.map(|m| m * 100.0)),
            opt(self.operating_margin.map(|m| m * 100.0)),
        )
    }
}

fn opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// Output of the reasoning node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<QueryIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Structured report the response node asks the LLM for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialInsight {
    pub executive_summary: String,
    #[serde(default)]
    pub key_metrics: Vec<MarketMetrics>,
    #[serde(default)]
    pub comparative_analysis: Option<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    pub final_insight: String,
    pub disclaimer: String,
}

impl FinancialInsight {
    /// Renders the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = format!(
            "# Financial Report\n\n## Executive Summary\n{}\n\n## Key Metrics\n",
            self.executive_summary
        );
        if !self.key_metrics.is_empty() {
            md.push_str("| Ticker | Price | Market Cap | PE | Volume |\n");
            md.push_str("| --- | --- | --- | --- | --- |\n");
            for m in &self.key_metrics {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    m.ticker,
                    opt(m.price),
                    opt(m.market_cap),
                    opt(m.pe_ratio),
                    opt(m.volume),
                ));
            }
        }
        if let Some(comparison) = self.comparative_analysis.as_deref().filter(|c| !c.is_empty()) {
            md.push_str(&format!("\n## Comparative Analysis\n{}\n", comparison));
        }
        md.push_str("\n## Risk Factors\n");
        for risk in &self.risk_factors {
            md.push_str(&format!("- {}\n", risk));
        }
        md.push_str(&format!("\n## Final Insight\n{}\n", self.final_insight));
        md.push_str(&format!("\n> [!WARNING]\n> {}", self.disclaimer));
        md
    }
}
