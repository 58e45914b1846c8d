//! Admin user management: CRUD, status changes and password resets.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use tr4cking_auth::password::{PasswordHasher, PasswordValidator};
use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, PersonId, UserId};
use tr4cking_database::repositories::UserRepository;
use tr4cking_entity::user::{CreateUser, UpdateUser, User, UserRole, UserStatus};

use crate::context::RequestContext;
use crate::{deleted, found};

/// Request to create a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    pub password: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub role: UserRole,
    pub person_id: Option<PersonId>,
}

/// Full replacement of a user's profile, role and status.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub person_id: Option<PersonId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// A role and what it may do.
#[derive(Debug, Clone, Serialize)]
pub struct RoleInfo {
    pub role: UserRole,
    pub permissions: Vec<SystemPermission>,
}

/// Handles user administration.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    rbac: Arc<RbacEnforcer>,
}

impl UserService {
    pub fn new(
        users: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            rbac,
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        role: Option<UserRole>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;
        self.users.list(role, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: UserId) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;
        found(self.users.find_by_id(id).await?, "User", id)
    }

    pub async fn create(&self, ctx: &RequestContext, req: &CreateUserRequest) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;

        let username = req.username.trim();
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Username '{username}' is already taken"
            )));
        }

        let mut inputs = vec![username];
        inputs.extend(req.email.as_deref());
        self.validator.validate(&req.password, &inputs)?;
        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: req.email.clone(),
                password_hash,
                first_name: req.first_name.clone(),
                last_name: req.last_name.clone(),
                role: req.role,
                person_id: req.person_id,
            })
            .await?;

        info!(
            admin = %ctx.username,
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "User created"
        );
        Ok(user)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: UserId,
        req: &UpdateUserRequest,
    ) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;
        if id == ctx.user_id && req.status != UserStatus::Active {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }
        if id == ctx.user_id && req.role != ctx.role {
            return Err(AppError::validation("You cannot change your own role"));
        }

        let user = self
            .users
            .update(
                id,
                &UpdateUser {
                    email: req.email.clone(),
                    first_name: req.first_name.clone(),
                    last_name: req.last_name.clone(),
                    role: req.role,
                    status: req.status,
                    person_id: req.person_id,
                },
            )
            .await?;

        info!(admin = %ctx.username, user_id = %id, status = %user.status, "User updated");
        Ok(user)
    }

    /// Enable or disable an account by username (administrative tooling).
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        username: &str,
        status: UserStatus,
    ) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;
        let user = found(
            self.users.find_by_username(username).await?,
            "User",
            username,
        )?;
        if user.id == ctx.user_id && status != UserStatus::Active {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }
        let user = self.users.set_status(user.id, status).await?;
        info!(admin = %ctx.username, user_id = %user.id, status = %status, "User status changed");
        Ok(user)
    }

    pub async fn set_password(
        &self,
        ctx: &RequestContext,
        id: UserId,
        password: &str,
    ) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;
        let user = found(self.users.find_by_id(id).await?, "User", id)?;

        let mut inputs = vec![user.username.as_str()];
        inputs.extend(user.email.as_deref());
        self.validator.validate(password, &inputs)?;

        let hash = self.hasher.hash_password(password)?;
        self.users.update_password(id, &hash).await?;
        info!(admin = %ctx.username, user_id = %id, "Password reset");
        Ok(())
    }

    pub async fn delete(&self, ctx: &RequestContext, id: UserId) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserManage)?;
        if id == ctx.user_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        deleted(self.users.delete(id).await?, "User", id)?;
        info!(admin = %ctx.username, user_id = %id, "User deleted");
        Ok(())
    }

    /// Every role with its permissions. Visible to any authenticated user.
    pub fn roles(&self) -> Vec<RoleInfo> {
        UserRole::ALL
            .into_iter()
            .map(|role| RoleInfo {
                role,
                permissions: self.rbac.policies().permissions_for_role(&role),
            })
            .collect()
    }
}
