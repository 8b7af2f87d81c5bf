//! Run config: API base, key, model, temperatures, market data. Filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions), [`run_with_config`](crate::run_with_config)
//! and querygraph's `ChatOpenAI`, `StaticMarketData`, `FetchPolicy`.

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use querygraph::pipeline::{FetchPolicy, StaticMarketData};
use querygraph::ChatOpenAI;

/// Temperature for parsing and report formatting, which must be deterministic.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Temperature for the analysis step.
pub const DEFAULT_REASONING_TEMPERATURE: f32 = 0.3;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Run config for the pipeline.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    /// OpenAI API key.
    pub api_key: String,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Sampling temperature for parsing and report formatting. Default: 0.
    pub temperature: f32,
    /// Sampling temperature for the analysis. Default: 0.3.
    pub reasoning_temperature: f32,
    /// JSON file of `{ "TICKER": { ...info... } }`. When unset, no ticker has data.
    pub market_data_path: Option<String>,
    /// Attempts per ticker when fetching market data.
    pub max_retries: u32,
    /// Pause between market data attempts.
    pub retry_delay: Duration,
    /// When true, report each node as it finishes.
    pub stream: bool,
    /// When true, print the effective config to stderr before running.
    pub verbose: bool,
}

impl RunConfig {
    /// Fill config from env vars (and .env). Call `dotenv::dotenv().ok()` first.
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_API_BASE`, `OPENAI_MODEL` have defaults.
    /// `OPENAI_TEMPERATURE`, `REASONING_TEMPERATURE`, `MARKET_DATA_PATH`,
    /// `MARKET_DATA_MAX_RETRIES` optional.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env",
            )
        })?;
        let api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let temperature = env_parse("OPENAI_TEMPERATURE").unwrap_or(DEFAULT_TEMPERATURE);
        let reasoning_temperature =
            env_parse("REASONING_TEMPERATURE").unwrap_or(DEFAULT_REASONING_TEMPERATURE);
        let market_data_path = std::env::var("MARKET_DATA_PATH").ok();
        let defaults = FetchPolicy::default();
        let max_retries = env_parse("MARKET_DATA_MAX_RETRIES").unwrap_or(defaults.max_retries);
        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            reasoning_temperature,
            market_data_path,
            max_retries,
            retry_delay: defaults.retry_delay,
            stream: false,
            verbose: false,
        })
    }

    /// Apply optional overrides from `RunOptions`. Only set fields override.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(model) = &options.model {
            self.model = model.clone();
        }
        if let Some(t) = options.temperature {
            self.temperature = t;
        }
        if let Some(t) = options.reasoning_temperature {
            self.reasoning_temperature = t;
        }
        if options.market_data_path.is_some() {
            self.market_data_path = options.market_data_path.clone();
        }
        if options.stream {
            self.stream = true;
        }
        self.verbose = options.verbose;
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
        }
    }

    /// OpenAI client for parsing and report formatting.
    pub fn create_llm(&self) -> ChatOpenAI {
        self.chat_openai(self.temperature)
    }

    /// OpenAI client for the analysis step.
    pub fn create_reasoning_llm(&self) -> ChatOpenAI {
        self.chat_openai(self.reasoning_temperature)
    }

    fn chat_openai(&self, temperature: f32) -> ChatOpenAI {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&self.api_key)
            .with_api_base(&self.api_base);
        ChatOpenAI::with_config(openai_config, self.model.clone()).with_temperature(temperature)
    }

    /// Loads market data from `market_data_path`, or an empty source when unset.
    pub fn load_market_data(&self) -> Result<StaticMarketData, Error> {
        match &self.market_data_path {
            Some(path) => Ok(StaticMarketData::from_json_file(path)?),
            None => {
                tracing::warn!("MARKET_DATA_PATH not set; no ticker will have market data");
                Ok(StaticMarketData::new())
            }
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
