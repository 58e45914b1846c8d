//! Login with failed-attempt lockout, and current-user lookup.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use tr4cking_auth::jwt::JwtEncoder;
use tr4cking_auth::password::PasswordHasher;
use tr4cking_core::AppError;
use tr4cking_core::config::AuthConfig;
use tr4cking_core::result::AppResult;
use tr4cking_database::repositories::UserRepository;
use tr4cking_entity::user::{User, UserStatus};

use crate::context::RequestContext;
use crate::found;

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Authenticates users and issues access tokens.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            config,
        }
    }

    /// Verify credentials and issue a token.
    ///
    /// Every failure on a known account counts toward the lockout threshold.
    pub async fn login(&self, req: &LoginRequest) -> AppResult<LoginResult> {
        let user = self
            .users
            .find_by_username(req.username.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        let now = Utc::now();
        check_can_login(&user, now)?;

        if !self.hasher.verify_password(&req.password, &user.password_hash)? {
            self.handle_failed_login(&user, now).await?;
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let user = self.users.record_login(user.id).await?;
        let issued = self
            .encoder
            .generate_access_token(user.id, user.role, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "Login successful");

        Ok(LoginResult {
            access_token: issued.access_token,
            expires_at: issued.expires_at,
            user,
        })
    }

    /// The user behind the current token.
    pub async fn current_user(&self, ctx: &RequestContext) -> AppResult<User> {
        found(self.users.find_by_id(ctx.user_id).await?, "User", ctx.user_id)
    }

    async fn handle_failed_login(&self, user: &User, now: DateTime<Utc>) -> AppResult<()> {
        let attempts = self.users.increment_failed_attempts(user.id).await?;

        if attempts >= self.config.max_failed_attempts {
            let minutes = i64::try_from(self.config.lockout_duration_minutes).unwrap_or(i64::MAX);
            let locked_until = now + Duration::minutes(minutes);
            self.users.lock_until(user.id, locked_until).await?;
            warn!(
                user_id = %user.id,
                username = %user.username,
                attempts,
                locked_until = %locked_until,
                "User account locked due to failed login attempts"
            );
        } else {
            warn!(user_id = %user.id, attempts, "Failed login attempt");
        }
        Ok(())
    }
}

fn check_can_login(user: &User, now: DateTime<Utc>) -> AppResult<()> {
    if user.status == UserStatus::Inactive {
        return Err(AppError::forbidden(
            "Account is deactivated. Contact an administrator.",
        ));
    }
    if user.is_locked_at(now) {
        return Err(match user.locked_until {
            Some(until) => AppError::forbidden(format!(
                "Account is locked until {}",
                until.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            None => AppError::forbidden("Account is locked. Contact an administrator."),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tr4cking_core::error::ErrorKind;
    use tr4cking_core::types::UserId;
    use tr4cking_entity::user::UserRole;

    use super::*;

    fn user(status: UserStatus, locked_until: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(3),
            username: "boleteria".into(),
            email: None,
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            role: UserRole::Clerk,
            status,
            failed_login_attempts: 0,
            locked_until,
            person_id: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn test_inactive_cannot_login() {
        let err = check_can_login(&user(UserStatus::Inactive, None), Utc::now()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_lock_window() {
        let now = Utc::now();
        let locked = user(UserStatus::Locked, Some(now + Duration::minutes(10)));
        assert!(check_can_login(&locked, now).is_err());

        let expired = user(UserStatus::Locked, Some(now - Duration::minutes(1)));
        assert!(check_can_login(&expired, now).is_ok());
    }

    #[test]
    fn test_active_can_login() {
        assert!(check_can_login(&user(UserStatus::Active, None), Utc::now()).is_ok());
    }
}
