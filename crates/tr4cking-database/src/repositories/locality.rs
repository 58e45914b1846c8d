//! Locality repository implementation.

use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{LocalityId, PageRequest, PageResponse};
use tr4cking_entity::geography::{Locality, LocalityInput};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Repository for localities.
#[derive(Debug, Clone)]
pub struct LocalityRepository {
    pool: PgPool,
}

impl LocalityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: LocalityId) -> AppResult<Option<Locality>> {
        sqlx::query_as::<_, Locality>("SELECT * FROM localities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find locality"))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Locality>> {
        sqlx::query_as::<_, Locality>("SELECT * FROM localities WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find locality by name"))
    }

    pub async fn list(
        &self,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Locality>> {
        let pattern = filter.pattern();
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM localities WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to count localities"))?;

        let items = sqlx::query_as::<_, Locality>(
            "SELECT * FROM localities WHERE ($1::TEXT IS NULL OR name ILIKE $1) \
             ORDER BY name LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list localities"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &LocalityInput) -> AppResult<Locality> {
        sqlx::query_as::<_, Locality>(
            "INSERT INTO localities (name, latitude, longitude) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create locality"))
    }

    pub async fn update(&self, id: LocalityId, input: &LocalityInput) -> AppResult<Locality> {
        sqlx::query_as::<_, Locality>(
            "UPDATE localities SET name = $2, latitude = $3, longitude = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update locality"))?
        .ok_or_else(|| AppError::not_found(format!("Locality {id} not found")))
    }

    pub async fn delete(&self, id: LocalityId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM localities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete locality"))?;
        Ok(result.rows_affected() > 0)
    }
}
