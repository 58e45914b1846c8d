//! Stop repository implementation.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{LocalityId, PageRequest, PageResponse, StopId};
use tr4cking_entity::geography::{Stop, StopInput};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Stop list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopFilter {
    pub locality_id: Option<LocalityId>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

/// Repository for stops.
#[derive(Debug, Clone)]
pub struct StopRepository {
    pool: PgPool,
}

impl StopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: StopId) -> AppResult<Option<Stop>> {
        sqlx::query_as::<_, Stop>("SELECT * FROM stops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find stop"))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Stop>> {
        sqlx::query_as::<_, Stop>("SELECT * FROM stops WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find stop by name"))
    }

    pub async fn list(
        &self,
        filter: &StopFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Stop>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR locality_id = $1) \
                               AND ($2::BOOLEAN IS NULL OR active = $2) \
                               AND ($3::TEXT IS NULL OR name ILIKE $3 OR address ILIKE $3)";
        let pattern = SearchFilter {
            search: filter.search.clone(),
        }
        .pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM stops {WHERE}"))
            .bind(filter.locality_id)
            .bind(filter.active)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count stops"))?;

        let items = sqlx::query_as::<_, Stop>(&format!(
            "SELECT * FROM stops {WHERE} ORDER BY name LIMIT $4 OFFSET $5"
        ))
        .bind(filter.locality_id)
        .bind(filter.active)
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list stops"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &StopInput) -> AppResult<Stop> {
        sqlx::query_as::<_, Stop>(
            "INSERT INTO stops (company_id, locality_id, kind, name, address, phone, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(input.company_id)
        .bind(input.locality_id)
        .bind(input.kind)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create stop"))
    }

    pub async fn update(&self, id: StopId, input: &StopInput) -> AppResult<Stop> {
        sqlx::query_as::<_, Stop>(
            "UPDATE stops SET company_id = $2, locality_id = $3, kind = $4, name = $5, \
                              address = $6, phone = $7, active = $8 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.company_id)
        .bind(input.locality_id)
        .bind(input.kind)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update stop"))?
        .ok_or_else(|| AppError::not_found(format!("Stop {id} not found")))
    }

    pub async fn delete(&self, id: StopId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM stops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete stop"))?;
        Ok(result.rows_affected() > 0)
    }
}
