//! Trip repository implementation.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{BusId, PageRequest, PageResponse, RouteId, TripId};
use tr4cking_entity::trip::{Trip, TripInput};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Trip list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripFilter {
    pub route_id: Option<RouteId>,
    pub bus_id: Option<BusId>,
    pub date: Option<NaiveDate>,
    pub active: Option<bool>,
}

/// Repository for trips.
#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: TripId) -> AppResult<Option<Trip>> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find trip"))
    }

    pub async fn list(
        &self,
        filter: &TripFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Trip>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR route_id = $1) \
                               AND ($2::BIGINT IS NULL OR bus_id = $2) \
                               AND ($3::DATE IS NULL OR date = $3) \
                               AND ($4::BOOLEAN IS NULL OR active = $4)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM trips {WHERE}"))
            .bind(filter.route_id)
            .bind(filter.bus_id)
            .bind(filter.date)
            .bind(filter.active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count trips"))?;

        let items = sqlx::query_as::<_, Trip>(&format!(
            "SELECT * FROM trips {WHERE} ORDER BY date DESC, id LIMIT $5 OFFSET $6"
        ))
        .bind(filter.route_id)
        .bind(filter.bus_id)
        .bind(filter.date)
        .bind(filter.active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list trips"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &TripInput) -> AppResult<Trip> {
        sqlx::query_as::<_, Trip>(
            "INSERT INTO trips (route_id, schedule_id, bus_id, date, active, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(input.route_id)
        .bind(input.schedule_id)
        .bind(input.bus_id)
        .bind(input.date)
        .bind(input.active)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create trip"))
    }

    /// Update a trip. Moving it to another bus is refused while tickets are
    /// sold on it, since those tickets hold seats of the current bus.
    pub async fn update(&self, id: TripId, input: &TripInput) -> AppResult<Trip> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_read_error(e, "Failed to begin transaction"))?;

        let current = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_read_error(e, "Failed to lock trip"))?
            .ok_or_else(|| AppError::not_found(format!("Trip {id} not found")))?;

        if current.bus_id != input.bus_id {
            let sold: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE trip_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_read_error(e, "Failed to count trip tickets"))?;
            if sold > 0 {
                return Err(AppError::conflict(format!(
                    "Trip {id} has {sold} ticket(s) on bus {}; cancel them to change the bus",
                    current.bus_id
                )));
            }
        }

        let trip = sqlx::query_as::<_, Trip>(
            "UPDATE trips SET route_id = $2, schedule_id = $3, bus_id = $4, date = $5, \
                              active = $6, notes = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.route_id)
        .bind(input.schedule_id)
        .bind(input.bus_id)
        .bind(input.date)
        .bind(input.active)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update trip"))?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit trip update"))?;
        Ok(trip)
    }

    /// Set `active` on many trips, returning how many rows changed.
    pub async fn set_active(&self, ids: &[TripId], active: bool) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE trips SET active = $2 WHERE id = ANY($1) AND active <> $2")
                .bind(ids)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(|e| map_write_error(e, "Failed to update trips"))?;
        Ok(result.rows_affected())
    }

    /// Delete a trip; its tickets cascade and their seats are released.
    pub async fn delete(&self, id: TripId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete trip"))?;
        Ok(result.rows_affected() > 0)
    }
}
