//! Health check handler.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::ApiResponse;
use crate::dto::response::HealthResponse;
use crate::state::AppState;

const DB_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let probe = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db_pool);
    let database_up = matches!(
        tokio::time::timeout(DB_PROBE_TIMEOUT, probe).await,
        Ok(Ok(1))
    );

    let (status, label, database) = if database_up {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        })),
    )
}
