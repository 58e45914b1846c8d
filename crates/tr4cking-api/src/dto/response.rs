//! Response DTOs.

use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// What most handlers return.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap `data` in the success envelope.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

/// `201 Created` with the new resource.
pub type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn created<T: Serialize>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

/// `204 No Content` after a delete.
pub type NoContent = Result<StatusCode, ApiError>;

pub fn no_content() -> NoContent {
    Ok(StatusCode::NO_CONTENT)
}

/// Row count of a bulk update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    pub version: String,
    /// `connected` or `unreachable`.
    pub database: String,
}
