//! Database migration commands.

use clap::{Args, Subcommand};

use tr4cking_core::error::AppError;

use crate::output;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            tr4cking_database::migration::run_migrations(&pool).await?;
            output::print_success("All migrations applied.");
        }
    }

    Ok(())
}
