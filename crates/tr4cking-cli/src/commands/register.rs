//! Cash register overview.

use std::collections::HashMap;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tr4cking_core::error::AppError;
use tr4cking_core::types::PageRequest;
use tr4cking_database::repositories::CashRegisterRepository;
use tr4cking_entity::register::RegisterSession;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[command(subcommand)]
    pub command: RegisterCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    /// List registers with their open session, if any
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct RegisterRow {
    id: String,
    name: String,
    status: String,
    session: String,
    opened_by: String,
    opened_at: String,
    opening_amount: String,
}

pub async fn execute(
    args: &RegisterArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let repo = CashRegisterRepository::new(pool);

    match &args.command {
        RegisterCommand::List => {
            let sessions: HashMap<_, RegisterSession> = repo
                .list_open()
                .await?
                .into_iter()
                .map(|open| (open.register.id, open.session))
                .collect();

            let mut rows = Vec::new();
            let mut page = 1;
            loop {
                let result = repo.list(&PageRequest::new(page, 100)).await?;
                for register in &result.items {
                    let session = sessions.get(&register.id);
                    rows.push(RegisterRow {
                        id: register.id.to_string(),
                        name: register.name.clone(),
                        status: register.status.to_string(),
                        session: session.map(|s| s.id.to_string()).unwrap_or_default(),
                        opened_by: session
                            .map(|s| s.opened_by.to_string())
                            .unwrap_or_default(),
                        opened_at: session
                            .map(|s| s.opened_at.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default(),
                        opening_amount: session
                            .map(|s| s.opening_amount.to_string())
                            .unwrap_or_default(),
                    });
                }
                if !result.has_next {
                    break;
                }
                page += 1;
            }

            output::print_list(&rows, format);
            if sessions.is_empty() && format == OutputFormat::Table {
                output::print_warning("No register is open; invoices cannot be issued.");
            }
        }
    }

    Ok(())
}
