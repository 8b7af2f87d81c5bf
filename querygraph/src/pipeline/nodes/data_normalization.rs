use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::AgentError;
use crate::graph::Node;
use crate::pipeline::fields::{FETCHED_DATA, NORMALIZED_METRICS};
use crate::pipeline::model::MarketMetrics;
use crate::pipeline::DATA_NORMALIZATION;
use crate::state::{PartialState, State};

/// Maps raw ticker info to `MarketMetrics`, skipping tickers with no data.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataNormalizationNode;

#[async_trait]
impl Node for DataNormalizationNode {
    fn id(&self) -> &str {
        DATA_NORMALIZATION
    }

    async fn run(&self, state: &State) -> Result<PartialState, AgentError> {
        let raw: Map<String, Value> = state.get_as(FETCHED_DATA)?.unwrap_or_default();
        let now = Utc::now();
        let metrics: Vec<MarketMetrics> = raw
            .iter()
            .filter(|(_, info)| info.as_object().map(|o| !o.is_empty()).unwrap_or(false))
            .map(|(ticker, info)| MarketMetrics::from_ticker_info(ticker, info, now))
            .collect();
        PartialState::new().with_as(NORMALIZED_METRICS, &metrics)
    }
}
