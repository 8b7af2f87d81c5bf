use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Node;
use crate::pipeline::QUERY_PLANNER;
use crate::state::{PartialState, State};

/// Pass-through stage; routing on the parsed intent happens on its outgoing edge.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryPlannerNode;

#[async_trait]
impl Node for QueryPlannerNode {
    fn id(&self) -> &str {
        QUERY_PLANNER
    }

    async fn run(&self, _state: &State) -> Result<PartialState, AgentError> {
        Ok(PartialState::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The planner writes nothing.
    #[tokio::test]
    async fn planner_returns_empty_update() {
        let out = QueryPlannerNode.run(&State::new()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(QueryPlannerNode.id(), "query_planner");
    }
}
