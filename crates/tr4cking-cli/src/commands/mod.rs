//! CLI command definitions and dispatch.

pub mod migrate;
pub mod register;
pub mod seed;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use tr4cking_core::config::AppConfig;
use tr4cking_core::error::AppError;
use tr4cking_database::DatabasePool;

use crate::output::OutputFormat;

/// Tr4cking: bus transport back office
#[derive(Debug, Parser)]
#[command(name = "tr4cking-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Load sample companies, buses, routes and fiscal data
    Seed,
    /// Cash register overview
    Register(register::RegisterArgs),
}

impl Cli {
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::User(args) => user::execute(args, &self.config, self.format).await,
            Commands::Seed => seed::execute(&self.config).await,
            Commands::Register(args) => register::execute(args, &self.config, self.format).await,
        }
    }
}

pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
