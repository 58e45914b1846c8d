//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, UserId};
use tr4cking_entity::user::{CreateUser, UpdateUser, User, UserRole, UserStatus};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Repository for user CRUD, lookup and login bookkeeping.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find user by id"))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find user by username"))
    }

    /// List users, optionally restricted to one role.
    pub async fn list(
        &self,
        role: Option<UserRole>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)")
                .bind(role)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_read_error(e, "Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE ($1::user_role IS NULL OR role = $1) \
             ORDER BY username ASC LIMIT $2 OFFSET $3",
        )
        .bind(role)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list users"))?;

        Ok(PageResponse::new(users, page, total))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, role, person_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.role)
        .bind(data.person_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))
    }

    /// Replace a user's profile, role and status.
    pub async fn update(&self, id: UserId, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = $2, first_name = $3, last_name = $4, role = $5, \
                              status = $6, person_id = $7, updated_at = NOW(), \
                              locked_until = CASE WHEN $6 = 'active' THEN NULL ELSE locked_until END, \
                              failed_login_attempts = CASE WHEN $6 = 'active' THEN 0 \
                                                           ELSE failed_login_attempts END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.role)
        .bind(data.status)
        .bind(data.person_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Set a user's status; re-activation clears any lockout.
    pub async fn set_status(&self, id: UserId, status: UserStatus) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW(), \
                              locked_until = CASE WHEN $2 = 'active' THEN NULL ELSE locked_until END, \
                              failed_login_attempts = CASE WHEN $2 = 'active' THEN 0 \
                                                           ELSE failed_login_attempts END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user status"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Update a user's password hash.
    pub async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| map_write_error(e, "Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    /// Increment failed login attempts, returning the new count.
    pub async fn increment_failed_attempts(&self, id: UserId) -> AppResult<i32> {
        let count: i32 = sqlx::query_scalar(
            "UPDATE users SET failed_login_attempts = failed_login_attempts + 1, \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING failed_login_attempts",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to increment failed attempts"))?;
        Ok(count)
    }

    /// Lock a user account until the given time.
    pub async fn lock_until(&self, id: UserId, until: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET status = 'locked', locked_until = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(until)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to lock user"))?;
        Ok(())
    }

    /// Record a successful login: clear lockout state and stamp the time.
    pub async fn record_login(&self, id: UserId) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET failed_login_attempts = 0, locked_until = NULL, \
                              status = CASE WHEN status = 'locked' THEN 'active' ELSE status END, \
                              last_login_at = NOW(), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to record login"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Delete a user by ID.
    pub async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count users.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count users"))
    }
}
