//! Effective config printed to stderr by [`run_with_config`](super::run_with_config)
//! when `config.verbose` is true. The API key is never shown.

use crate::config::RunConfig;

/// `key=value` entries of the summary, in print order.
pub fn config_summary(config: &RunConfig) -> Vec<(&'static str, String)> {
    vec![
        ("model", config.model.clone()),
        ("api_base", config.api_base.clone()),
        ("temperature", config.temperature.to_string()),
        (
            "reasoning_temperature",
            config.reasoning_temperature.to_string(),
        ),
        (
            "market_data",
            config
                .market_data_path
                .clone()
                .unwrap_or_else(|| "(none)".to_string()),
        ),
        ("max_retries", config.max_retries.to_string()),
        ("retry_delay_ms", config.retry_delay.as_millis().to_string()),
        ("stream", config.stream.to_string()),
    ]
}

/// Writes the summary as one `key=value` line per entry.
pub fn print_config_summary(config: &RunConfig) {
    eprintln!("Run config:");
    for (key, value) in config_summary(config) {
        eprintln!("  {}={}", key, value);
    }
}
