//! Intent routing after `query_planner`.

use crate::graph::{LabelRouter, RouteLabel};
use crate::state::State;

use super::fields::PARSED_QUERY;
use super::model::FinancialQuery;

/// Labels of the intent router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteIntent {
    /// Run the data chain: fetch, normalize, embed, retrieve.
    Fetch,
    /// Skip straight to reasoning.
    Reason,
}

impl RouteLabel for RouteIntent {
    const ALL: &'static [Self] = &[RouteIntent::Fetch, RouteIntent::Reason];

    fn as_str(&self) -> &'static str {
        match self {
            RouteIntent::Fetch => "fetch",
            RouteIntent::Reason => "reason",
        }
    }
}

/// `reason` for intents that need no market data, `fetch` otherwise (including when
/// `parsed_query` is missing or unreadable).
pub fn route_intent(state: &State) -> RouteIntent {
    match state.get_as::<FinancialQuery>(PARSED_QUERY) {
        Ok(Some(query)) if !query.intent.needs_external_data() => RouteIntent::Reason,
        _ => RouteIntent::Fetch,
    }
}

pub type IntentRouter = LabelRouter<RouteIntent, fn(&State) -> RouteIntent>;

pub fn intent_router() -> IntentRouter {
    LabelRouter::new(route_intent as fn(&State) -> RouteIntent)
}
