//! Market data collaborator: per-ticker info lookups with retry.
//!
//! **Interaction**: `data_fetch` calls [`fetch_market_data`] with an
//! `Arc<dyn MarketDataSource>`. A ticker that keeps failing maps to `{}` so one bad
//! symbol never fails the whole request.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AgentError;

/// Source of raw ticker info objects (Yahoo-style keys such as `currentPrice`).
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Info for one ticker. `Ok(None)` when the source has no data for it.
    async fn ticker_info(&self, ticker: &str) -> Result<Option<Value>, AgentError>;
}

/// In-memory market data, keyed by ticker.
#[derive(Clone, Debug, Default)]
pub struct StaticMarketData {
    tickers: HashMap<String, Value>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>, info: Value) -> Self {
        self.tickers.insert(ticker.into(), info);
        self
    }

    /// Loads a JSON object of `{ "TICKER": { ...info... } }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgentError::ExecutionFailed(format!(
                "failed to read market data {}: {}",
                path.display(),
                e
            ))
        })?;
        let tickers: HashMap<String, Value> = serde_json::from_str(&raw)?;
        Ok(Self { tickers })
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    async fn ticker_info(&self, ticker: &str) -> Result<Option<Value>, AgentError> {
        Ok(self.tickers.get(ticker).cloned())
    }
}

/// Retry policy for [`fetch_market_data`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Attempts per ticker; `0` is treated as one attempt.
    pub max_retries: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Fetches info for every ticker, retrying each one per `policy`.
///
/// Returns a JSON object keyed by ticker; tickers without data after the last attempt
/// map to an empty object.
pub async fn fetch_market_data(
    source: &dyn MarketDataSource,
    tickers: &[String],
    policy: &FetchPolicy,
) -> Map<String, Value> {
    let mut data = Map::new();
    for ticker in tickers {
        let info = fetch_one(source, ticker, policy).await;
        data.insert(ticker.clone(), info);
    }
    data
}

async fn fetch_one(source: &dyn MarketDataSource, ticker: &str, policy: &FetchPolicy) -> Value {
    let attempts = policy.max_retries.max(1);
    for attempt in 1..=attempts {
        let failure = match source.ticker_info(ticker).await {
            Ok(Some(info)) if is_usable(&info) => return info,
            Ok(_) => format!("no data found for {}", ticker),
            Err(e) => e.to_string(),
        };
        tracing::warn!(ticker, attempt, error = %failure, "market data attempt failed");
        if attempt < attempts && !policy.retry_delay.is_zero() {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }
    tracing::error!(ticker, attempts, "giving up on market data");
    Value::Object(Map::new())
}

fn is_usable(info: &Value) -> bool {
    info.as_object().map(|o| !o.is_empty()).unwrap_or(false)
}
