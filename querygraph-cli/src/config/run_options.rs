//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

/// Optional overrides for a run. Only set fields override the env-based config.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override model name.
    pub model: Option<String>,
    /// Override the parsing and report temperature (0–2).
    pub temperature: Option<f32>,
    /// Override the analysis temperature (0–2).
    pub reasoning_temperature: Option<f32>,
    /// Override path of the market data JSON file.
    pub market_data_path: Option<String>,
    /// Report each node as it finishes.
    pub stream: bool,
    /// Debug-level logs and a config summary on stderr.
    pub verbose: bool,
}
