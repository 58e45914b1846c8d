//! Seat repository implementation.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{BusId, PageRequest, PageResponse, SeatId, TripId};
use tr4cking_entity::fleet::{Seat, SeatState, SeatUpdate, TripSeat};

use crate::error::{map_read_error, map_write_error};

/// Seat list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatFilter {
    pub bus_id: Option<BusId>,
    pub state: Option<SeatState>,
}

/// Repository for seats. Seats are created and removed only by bus writes.
#[derive(Debug, Clone)]
pub struct SeatRepository {
    pool: PgPool,
}

impl SeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: SeatId) -> AppResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find seat"))
    }

    pub async fn list(
        &self,
        filter: &SeatFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Seat>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR bus_id = $1) \
                               AND ($2::seat_state IS NULL OR state = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM seats {WHERE}"))
            .bind(filter.bus_id)
            .bind(filter.state)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count seats"))?;

        let items = sqlx::query_as::<_, Seat>(&format!(
            "SELECT * FROM seats {WHERE} ORDER BY bus_id, number LIMIT $3 OFFSET $4"
        ))
        .bind(filter.bus_id)
        .bind(filter.state)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list seats"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// All seats of a bus by number.
    pub async fn list_by_bus(&self, bus_id: BusId) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE bus_id = $1 ORDER BY number")
            .bind(bus_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to list bus seats"))
    }

    /// The trip's bus seats, each with the trip's ticket on it, if any.
    pub async fn list_for_trip(&self, trip_id: TripId) -> AppResult<Vec<TripSeat>> {
        sqlx::query_as::<_, TripSeat>(
            "SELECT s.id, s.number, s.state, s.kind, t.id AS ticket_id \
             FROM trips tr \
             JOIN seats s ON s.bus_id = tr.bus_id \
             LEFT JOIN tickets t ON t.seat_id = s.id AND t.trip_id = tr.id \
             WHERE tr.id = $1 \
             ORDER BY s.number",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list trip seats"))
    }

    /// Change a seat's kind and, between available and reserved, its state.
    pub async fn update(&self, id: SeatId, input: &SeatUpdate) -> AppResult<Seat> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_read_error(e, "Failed to begin transaction"))?;

        let seat = sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_read_error(e, "Failed to lock seat"))?
            .ok_or_else(|| AppError::not_found(format!("Seat {id} not found")))?;

        seat.state.check_manual_transition(input.state)?;

        let updated = sqlx::query_as::<_, Seat>(
            "UPDATE seats SET state = $2, kind = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.state)
        .bind(input.kind)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update seat"))?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit seat update"))?;
        Ok(updated)
    }
}
