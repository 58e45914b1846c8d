//! Tracing subscriber setup shared by the server and the CLI.

use tracing_subscriber::{EnvFilter, fmt};

use tr4cking_core::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
pub fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing was already initialized: {e}");
    }
}
