//! Authentication handlers.

use axum::extract::State;

use tr4cking_entity::user::User;
use tr4cking_service::LoginResult;
use tr4cking_service::auth::LoginRequest;

use crate::dto::{self, ApiResult};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResult> {
    dto::ok(state.auth_service.login(&req).await?)
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<User> {
    dto::ok(state.auth_service.current_user(&auth).await?)
}
