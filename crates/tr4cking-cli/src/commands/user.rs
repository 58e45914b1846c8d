//! User management CLI commands.

use clap::{Args, Subcommand};
use dialoguer::Password;
use serde::Serialize;
use tabled::Tabled;

use tr4cking_api::AppState;
use tr4cking_core::error::AppError;
use tr4cking_core::types::PageRequest;
use tr4cking_database::repositories::UserRepository;
use tr4cking_entity::user::{User, UserRole, UserStatus};
use tr4cking_service::RequestContext;
use tr4cking_service::user::CreateUserRequest;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user, prompting for the password
    Create {
        username: String,
        /// Role: admin, manager, clerk or viewer
        #[arg(short, long, default_value = "clerk")]
        role: UserRole,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List all users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<UserRole>,
    },
    /// Enable a user
    Enable { username: String },
    /// Disable a user
    Disable { username: String },
    /// Reset a user's password
    SetPassword { username: String },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    role: String,
    status: String,
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            email: u.email.clone().unwrap_or_default(),
            role: u.role.to_string(),
            status: u.status.to_string(),
            last_login: u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let state = AppState::new(config, pool.clone())?;
    let ctx = RequestContext::system();

    match &args.command {
        UserCommand::Create {
            username,
            role,
            email,
        } => {
            let password = prompt_password()?;
            let user = state
                .user_service
                .create(
                    &ctx,
                    &CreateUserRequest {
                        username: username.clone(),
                        password,
                        email: email.clone(),
                        first_name: None,
                        last_name: None,
                        role: *role,
                        person_id: None,
                    },
                )
                .await?;
            output::print_success(&format!(
                "User '{}' created with role {}",
                user.username, user.role
            ));
        }
        UserCommand::List { role } => {
            let mut rows = Vec::new();
            let mut page = 1;
            loop {
                let result = state
                    .user_service
                    .list(&ctx, *role, &PageRequest::new(page, 100))
                    .await?;
                rows.extend(result.items.iter().map(UserRow::from));
                if !result.has_next {
                    break;
                }
                page += 1;
            }
            output::print_list(&rows, format);
        }
        UserCommand::Enable { username } => {
            state
                .user_service
                .set_status(&ctx, username, UserStatus::Active)
                .await?;
            output::print_success(&format!("User '{username}' enabled"));
        }
        UserCommand::Disable { username } => {
            state
                .user_service
                .set_status(&ctx, username, UserStatus::Inactive)
                .await?;
            output::print_success(&format!("User '{username}' disabled"));
        }
        UserCommand::SetPassword { username } => {
            let user = UserRepository::new(pool)
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;
            let password = prompt_password()?;
            state
                .user_service
                .set_password(&ctx, user.id, &password)
                .await?;
            output::print_success(&format!("Password updated for '{username}'"));
        }
    }

    Ok(())
}

fn prompt_password() -> Result<String, AppError> {
    Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| AppError::internal(format!("Failed to read password: {e}")))
}
