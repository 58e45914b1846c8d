//! Tr4cking server: bus transport back office.
//!
//! Loads configuration, applies migrations and serves the HTTP API.

use tr4cking_core::config::AppConfig;
use tr4cking_core::error::AppError;
use tr4cking_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config_path =
        std::env::var("TR4CKING_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let config = match AppConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from '{config_path}': {e}");
            std::process::exit(1);
        }
    };

    tr4cking_api::telemetry::init_tracing(&config.logging);
    tracing::info!(config = %config_path, version = env!("CARGO_PKG_VERSION"), "Starting Tr4cking");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    tr4cking_database::migration::run_migrations(db.pool()).await?;
    tr4cking_api::run_server(config, db.into_pool()).await
}
