//! Route, route stop and schedule repositories.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, RouteId, RouteStopId, ScheduleId};
use tr4cking_entity::route::{
    Route, RouteInput, RouteStop, RouteStopInput, RouteStopView, Schedule, ScheduleInput,
};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Route list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteFilter {
    pub active: Option<bool>,
    pub search: Option<String>,
}

/// Filter for children of a route (stops, schedules).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteChildFilter {
    pub route_id: Option<RouteId>,
}

/// Repository for routes.
#[derive(Debug, Clone)]
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: RouteId) -> AppResult<Option<Route>> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find route"))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Route>> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find route by name"))
    }

    pub async fn list(
        &self,
        filter: &RouteFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Route>> {
        const WHERE: &str = "WHERE ($1::BOOLEAN IS NULL OR active = $1) \
                               AND ($2::TEXT IS NULL OR name ILIKE $2)";
        let pattern = SearchFilter {
            search: filter.search.clone(),
        }
        .pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM routes {WHERE}"))
            .bind(filter.active)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count routes"))?;

        let items = sqlx::query_as::<_, Route>(&format!(
            "SELECT * FROM routes {WHERE} ORDER BY name LIMIT $3 OFFSET $4"
        ))
        .bind(filter.active)
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list routes"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &RouteInput) -> AppResult<Route> {
        sqlx::query_as::<_, Route>(
            "INSERT INTO routes (name, total_duration_hours, distance_km, base_price, active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&input.name)
        .bind(input.total_duration_hours)
        .bind(input.distance_km)
        .bind(input.base_price)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create route"))
    }

    pub async fn update(&self, id: RouteId, input: &RouteInput) -> AppResult<Route> {
        sqlx::query_as::<_, Route>(
            "UPDATE routes SET name = $2, total_duration_hours = $3, distance_km = $4, \
                               base_price = $5, active = $6, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.total_duration_hours)
        .bind(input.distance_km)
        .bind(input.base_price)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update route"))?
        .ok_or_else(|| AppError::not_found(format!("Route {id} not found")))
    }

    pub async fn delete(&self, id: RouteId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete route"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Ordered stops of a route with stop and locality names.
    pub async fn stops_of(&self, route_id: RouteId) -> AppResult<Vec<RouteStopView>> {
        sqlx::query_as::<_, RouteStopView>(
            "SELECT rs.id, rs.stop_id, rs.position, rs.departure_time, \
                    s.name AS stop_name, l.name AS locality_name \
             FROM route_stops rs \
             JOIN stops s ON s.id = rs.stop_id \
             JOIN localities l ON l.id = s.locality_id \
             WHERE rs.route_id = $1 \
             ORDER BY rs.position",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list route stops"))
    }
}

/// Repository for route stops.
#[derive(Debug, Clone)]
pub struct RouteStopRepository {
    pool: PgPool,
}

impl RouteStopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: RouteStopId) -> AppResult<Option<RouteStop>> {
        sqlx::query_as::<_, RouteStop>("SELECT * FROM route_stops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find route stop"))
    }

    pub async fn list(
        &self,
        filter: &RouteChildFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RouteStop>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM route_stops WHERE ($1::BIGINT IS NULL OR route_id = $1)",
        )
        .bind(filter.route_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to count route stops"))?;

        let items = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE ($1::BIGINT IS NULL OR route_id = $1) \
             ORDER BY route_id, position LIMIT $2 OFFSET $3",
        )
        .bind(filter.route_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list route stops"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &RouteStopInput) -> AppResult<RouteStop> {
        sqlx::query_as::<_, RouteStop>(
            "INSERT INTO route_stops (route_id, stop_id, position, departure_time) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(input.route_id)
        .bind(input.stop_id)
        .bind(input.position)
        .bind(input.departure_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create route stop"))
    }

    pub async fn update(&self, id: RouteStopId, input: &RouteStopInput) -> AppResult<RouteStop> {
        sqlx::query_as::<_, RouteStop>(
            "UPDATE route_stops SET route_id = $2, stop_id = $3, position = $4, departure_time = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.route_id)
        .bind(input.stop_id)
        .bind(input.position)
        .bind(input.departure_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update route stop"))?
        .ok_or_else(|| AppError::not_found(format!("Route stop {id} not found")))
    }

    pub async fn delete(&self, id: RouteStopId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM route_stops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete route stop"))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Repository for schedules.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: ScheduleId) -> AppResult<Option<Schedule>> {
        sqlx::query_as::<_, Schedule>("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find schedule"))
    }

    pub async fn list(
        &self,
        filter: &RouteChildFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Schedule>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM schedules WHERE ($1::BIGINT IS NULL OR route_id = $1)",
        )
        .bind(filter.route_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to count schedules"))?;

        let items = sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE ($1::BIGINT IS NULL OR route_id = $1) \
             ORDER BY route_id, departure_time LIMIT $2 OFFSET $3",
        )
        .bind(filter.route_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list schedules"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &ScheduleInput) -> AppResult<Schedule> {
        sqlx::query_as::<_, Schedule>(
            "INSERT INTO schedules (route_id, departure_time, weekdays, active) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(input.route_id)
        .bind(input.departure_time)
        .bind(input.weekdays)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create schedule"))
    }

    pub async fn update(&self, id: ScheduleId, input: &ScheduleInput) -> AppResult<Schedule> {
        sqlx::query_as::<_, Schedule>(
            "UPDATE schedules SET route_id = $2, departure_time = $3, weekdays = $4, active = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.route_id)
        .bind(input.departure_time)
        .bind(input.weekdays)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update schedule"))?
        .ok_or_else(|| AppError::not_found(format!("Schedule {id} not found")))
    }

    pub async fn delete(&self, id: ScheduleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete schedule"))?;
        Ok(result.rows_affected() > 0)
    }
}
