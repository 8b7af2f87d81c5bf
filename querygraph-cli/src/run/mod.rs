//! Run entry points: run with default config, run_with_config, or run_with_options.
//!
//! Re-exports [`run`], [`run_with_config`], [`run_with_options`] and [`Error`].

pub use crate::config::Error;

mod common;
mod summary;
mod run_with_config;

use querygraph::pipeline::fields::FINAL_RESPONSE;
use querygraph::RunOutcome;

use crate::config::{RunConfig, RunOptions};

pub(crate) use common::run_pipeline;
pub use summary::{config_summary, print_config_summary};
pub use run_with_config::run_with_config;

/// Run the pipeline with default config (from .env).
///
/// Loads `.env` internally, then calls `run_with_config`.
pub async fn run(user_message: &str) -> Result<RunOutcome, Error> {
    dotenv::dotenv().ok();
    let config = RunConfig::from_env()?;
    run_with_config(&config, user_message).await
}

/// Run the pipeline with config from env and optional overrides (e.g. from CLI).
///
/// Loads `.env`, builds `RunConfig` from env, applies `options`, then runs.
pub async fn run_with_options(
    user_message: &str,
    options: &RunOptions,
) -> Result<RunOutcome, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, user_message).await
}

/// Text to show the user for a finished run.
///
/// A halted run is an error carrying its fault. A run that stopped on the `error`
/// field without producing a response is an error with that message.
pub fn response_text(outcome: &RunOutcome) -> Result<String, Error> {
    if let Some(fault) = outcome.fault() {
        return Err(fault.to_string().into());
    }
    match outcome.state.get(FINAL_RESPONSE).and_then(|v| v.as_str()) {
        Some(text) => Ok(text.to_string()),
        None => match outcome.state.error() {
            Some(error) => Err(error.to_string().into()),
            None => Err("run finished without a response".into()),
        },
    }
}
