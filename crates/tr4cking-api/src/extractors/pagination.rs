//! Pagination query parameter extractor.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use tr4cking_core::error::AppError;
use tr4cking_core::types::PageRequest;
use tr4cking_core::types::pagination::DEFAULT_PAGE_SIZE;

use crate::error::ApiError;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// `?page=&per_page=` resolved into a clamped [`PageRequest`].
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageRequest);

impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid pagination: {}", e.body_text())))?;
        Ok(Self(params.into_page_request()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_page_is_capped() {
        let page = PaginationParams {
            page: 0,
            per_page: 500,
        }
        .into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }

    #[test]
    fn test_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").expect("defaults");
        let page = params.into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 25);
    }
}
