//! Run the pipeline against the real OpenAI API with an explicit [`RunConfig`].

use std::sync::Arc;

use querygraph::pipeline::{Collaborators, HashingEmbedder, InMemoryVectorStore};
use querygraph::RunOutcome;

use crate::config::RunConfig;

use super::{print_config_summary, run_pipeline, Error};

/// Run the pipeline with explicit config (no .env loading).
///
/// Uses two `ChatOpenAI` clients (one per temperature), market data from
/// `config.market_data_path` and a fresh in-memory vector store. Prints the effective
/// config to stderr first when `config.verbose` is set.
pub async fn run_with_config(config: &RunConfig, user_message: &str) -> Result<RunOutcome, Error> {
    if config.verbose {
        print_config_summary(config);
    }
    let market = config.load_market_data()?;
    let store = InMemoryVectorStore::new(Arc::new(HashingEmbedder::default()));
    let collaborators = Collaborators::new(
        Arc::new(config.create_llm()),
        Arc::new(market),
        Arc::new(store),
    )
    .with_reasoning_llm(Arc::new(config.create_reasoning_llm()))
    .with_fetch_policy(config.fetch_policy());

    tracing::debug!(model = %config.model, stream = config.stream, "running pipeline");
    run_pipeline(user_message, &collaborators, config.stream).await
}
