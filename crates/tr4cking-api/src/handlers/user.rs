//! User administration handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{PageResponse, UserId};
use tr4cking_entity::user::User;
use tr4cking_service::user::{CreateUserRequest, RoleInfo, SetPasswordRequest, UpdateUserRequest};

use crate::dto::request::UserListQuery;
use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(query): QueryFilter<UserListQuery>,
) -> ApiResult<PageResponse<User>> {
    dto::ok(state.user_service.list(&auth, query.role, &page).await?)
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> ApiResult<User> {
    dto::ok(state.user_service.get(&auth, id).await?)
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Created<User> {
    dto::created(state.user_service.create(&auth, &req).await?)
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    dto::ok(state.user_service.update(&auth, id, &req).await?)
}

/// PUT /api/users/{id}/password
pub async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(req): ValidatedJson<SetPasswordRequest>,
) -> NoContent {
    state
        .user_service
        .set_password(&auth, id, &req.password)
        .await?;
    dto::no_content()
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> NoContent {
    state.user_service.delete(&auth, id).await?;
    dto::no_content()
}

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Vec<RoleInfo>> {
    dto::ok(state.user_service.roles())
}
