//! querygraph-cli library: reusable pipeline run logic for other crates.
//!
//! Reads OpenAI and market data config from .env, builds the financial query pipeline,
//! runs it and returns the outcome.
//!
//! ## Usage
//!
//! ```rust,no_run,ignore
//! let outcome = querygraph_cli::run("Compare TCS and Infosys").await?;
//! println!("{}", querygraph_cli::response_text(&outcome)?);
//! ```

mod config;
mod logging;
mod middleware;
mod run;

pub use config::{Error, RunConfig, RunOptions};
pub use logging::init_tracing;
pub use middleware::{LoggingMiddleware, WithNodeLogging};
pub use querygraph::{RunOutcome, State};
pub use run::{
    config_summary, print_config_summary, response_text, run, run_with_config, run_with_options,
};

#[cfg(test)]
mod tests;
