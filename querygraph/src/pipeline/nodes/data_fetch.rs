use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AgentError;
use crate::graph::Node;
use crate::pipeline::fields::{FETCHED_DATA, PARSED_QUERY};
use crate::pipeline::market_data::{fetch_market_data, FetchPolicy, MarketDataSource};
use crate::pipeline::model::FinancialQuery;
use crate::pipeline::DATA_FETCH;
use crate::state::{PartialState, State};

/// Placeholder ticker some parsers emit for greetings; never fetched.
const GREETING_TICKER: &str = "GREETING";

/// Fetches raw ticker info for the parsed tickers.
pub struct DataFetchNode {
    market: Arc<dyn MarketDataSource>,
    policy: FetchPolicy,
}

impl DataFetchNode {
    pub fn new(market: Arc<dyn MarketDataSource>, policy: FetchPolicy) -> Self {
        Self { market, policy }
    }
}

#[async_trait]
impl Node for DataFetchNode {
    fn id(&self) -> &str {
        DATA_FETCH
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        let Some(query) = state.get_as::<FinancialQuery>(PARSED_QUERY)? else {
            return Ok(PartialState::error("No parsed query found."));
        };
        let tickers: Vec<String> = query
            .tickers
            .into_iter()
            .filter(|t| t != GREETING_TICKER)
            .collect();
        if tickers.is_empty() {
            return Ok(PartialState::new().with(FETCHED_DATA, Value::Object(Map::new())));
        }
        let data = fetch_market_data(self.market.as_ref(), &tickers, &self.policy).await;
        Ok(PartialState::new().with(FETCHED_DATA, Value::Object(data)))
    }
}
