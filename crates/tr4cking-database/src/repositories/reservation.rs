//! Reservation repository implementation.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{CustomerId, PageRequest, PageResponse, ReservationId};
use tr4cking_entity::ticketing::{Reservation, ReservationInput, ReservationStatus};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Reservation list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub customer_id: Option<CustomerId>,
    pub status: Option<ReservationStatus>,
}

/// Repository for reservations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find reservation"))
    }

    pub async fn list(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR customer_id = $1) \
                               AND ($2::reservation_status IS NULL OR status = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM reservations {WHERE}"))
            .bind(filter.customer_id)
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count reservations"))?;

        let items = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT * FROM reservations {WHERE} ORDER BY reserved_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list reservations"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &ReservationInput) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (customer_id, status) VALUES ($1, $2) RETURNING *",
        )
        .bind(input.customer_id)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create reservation"))
    }

    pub async fn update(
        &self,
        id: ReservationId,
        input: &ReservationInput,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET customer_id = $2, status = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.customer_id)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update reservation"))?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))
    }

    /// Delete a reservation; its tickets cascade and their seats are released.
    pub async fn delete(&self, id: ReservationId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete reservation"))?;
        Ok(result.rows_affected() > 0)
    }
}
