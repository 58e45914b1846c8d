//! Start the Tr4cking server.

use clap::Args;

use tr4cking_core::error::AppError;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip running migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    tr4cking_api::telemetry::init_tracing(&config.logging);

    let pool = super::create_db_pool(&config).await?;

    if !args.no_migrate {
        tr4cking_database::migration::run_migrations(&pool).await?;
    }

    tr4cking_api::run_server(config, pool).await
}
