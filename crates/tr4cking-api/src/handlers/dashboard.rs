//! Dashboard handler.

use axum::extract::State;

use tr4cking_entity::register::DashboardStats;

use crate::dto::{self, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard
pub async fn stats(State(state): State<AppState>, auth: AuthUser) -> ApiResult<DashboardStats> {
    dto::ok(state.dashboard_service.stats(&auth).await?)
}
