//! Ticket repository.
//!
//! Every ticket write runs in one transaction that locks the seat row
//! first, so a seat is `occupied` exactly while some ticket references it.

use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{
    PageRequest, PageResponse, PassengerId, ReservationId, SeatId, TicketId, TripId,
};
use tr4cking_entity::fleet::Seat;
use tr4cking_entity::ticketing::{Ticket, TicketInput};
use tr4cking_entity::trip::Trip;

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Ticket list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketFilter {
    pub trip_id: Option<TripId>,
    pub passenger_id: Option<PassengerId>,
    pub reservation_id: Option<ReservationId>,
}

/// Repository for tickets and the seat state they drive.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: TicketId) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find ticket"))
    }

    pub async fn list(
        &self,
        filter: &TicketFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Ticket>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR trip_id = $1) \
                               AND ($2::BIGINT IS NULL OR passenger_id = $2) \
                               AND ($3::BIGINT IS NULL OR reservation_id = $3)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tickets {WHERE}"))
            .bind(filter.trip_id)
            .bind(filter.passenger_id)
            .bind(filter.reservation_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count tickets"))?;

        let items = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT * FROM tickets {WHERE} ORDER BY issued_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.trip_id)
        .bind(filter.passenger_id)
        .bind(filter.reservation_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list tickets"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Issue a ticket and mark its seat occupied.
    pub async fn issue(&self, input: &TicketInput) -> AppResult<Ticket> {
        let mut tx = self.begin().await?;

        let trip = load_active_trip(&mut tx, input.trip_id).await?;
        let seat = lock_seat_on_bus(&mut tx, input.seat_id, &trip).await?;
        ensure_sellable(&seat)?;

        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (reservation_id, trip_id, seat_id, passenger_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(input.reservation_id)
        .bind(input.trip_id)
        .bind(input.seat_id)
        .bind(input.passenger_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to issue ticket"))?;

        occupy_seat(&mut tx, seat.id).await?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit ticket issue"))?;
        debug!(ticket_id = %ticket.id, seat_id = %seat.id, "Seat occupied");
        Ok(ticket)
    }

    /// Replace a ticket. Moving it to another seat releases the old seat and
    /// occupies the new one atomically.
    pub async fn replace(&self, id: TicketId, input: &TicketInput) -> AppResult<Ticket> {
        let mut tx = self.begin().await?;

        let current = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_read_error(e, "Failed to lock ticket"))?
            .ok_or_else(|| AppError::not_found(format!("Ticket {id} not found")))?;

        let moving = current.changes_seat(input);
        if moving {
            let trip = load_active_trip(&mut tx, input.trip_id).await?;
            let seat = lock_seat_on_bus(&mut tx, input.seat_id, &trip).await?;
            if seat.id != current.seat_id {
                ensure_sellable(&seat)?;
            }
        }

        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET reservation_id = $2, trip_id = $3, seat_id = $4, passenger_id = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.reservation_id)
        .bind(input.trip_id)
        .bind(input.seat_id)
        .bind(input.passenger_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update ticket"))?;

        if moving && current.seat_id != ticket.seat_id {
            release_seat(&mut tx, current.seat_id).await?;
            occupy_seat(&mut tx, ticket.seat_id).await?;
            debug!(
                ticket_id = %id,
                from_seat = %current.seat_id,
                to_seat = %ticket.seat_id,
                "Ticket moved"
            );
        }

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit ticket update"))?;
        Ok(ticket)
    }

    /// Cancel a ticket and release its seat. Returns the deleted ticket.
    pub async fn cancel(&self, id: TicketId) -> AppResult<Option<Ticket>> {
        let mut tx = self.begin().await?;

        let deleted = sqlx::query_as::<_, Ticket>("DELETE FROM tickets WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_delete_error(e, "Failed to cancel ticket"))?;

        if let Some(ticket) = &deleted {
            release_seat(&mut tx, ticket.seat_id).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit ticket cancellation"))?;
        Ok(deleted)
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_read_error(e, "Failed to begin transaction"))
    }
}

async fn load_active_trip(
    tx: &mut Transaction<'static, Postgres>,
    trip_id: TripId,
) -> AppResult<Trip> {
    let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
        .bind(trip_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to load trip"))?
        .ok_or_else(|| AppError::validation(format!("Trip {trip_id} does not exist")))?;
    if !trip.active {
        return Err(AppError::conflict(format!(
            "Trip {trip_id} is not active and cannot sell tickets"
        )));
    }
    Ok(trip)
}

async fn lock_seat_on_bus(
    tx: &mut Transaction<'static, Postgres>,
    seat_id: SeatId,
    trip: &Trip,
) -> AppResult<Seat> {
    let seat = sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1 FOR UPDATE")
        .bind(seat_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to lock seat"))?
        .ok_or_else(|| AppError::validation(format!("Seat {seat_id} does not exist")))?;
    if seat.bus_id != trip.bus_id {
        return Err(AppError::validation(format!(
            "Seat {seat_id} does not belong to the bus of trip {}",
            trip.id
        )));
    }
    Ok(seat)
}

fn ensure_sellable(seat: &Seat) -> AppResult<()> {
    if seat.state.can_sell() {
        Ok(())
    } else {
        Err(AppError::conflict(format!(
            "Seat {} is not available (currently {})",
            seat.number, seat.state
        )))
    }
}

async fn occupy_seat(tx: &mut Transaction<'static, Postgres>, seat_id: SeatId) -> AppResult<()> {
    sqlx::query("UPDATE seats SET state = 'occupied' WHERE id = $1")
        .bind(seat_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to occupy seat"))?;
    Ok(())
}

/// Mark a seat available unless another ticket still holds it.
async fn release_seat(tx: &mut Transaction<'static, Postgres>, seat_id: SeatId) -> AppResult<()> {
    sqlx::query(
        "UPDATE seats SET state = 'available' \
         WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM tickets WHERE seat_id = $1)",
    )
    .bind(seat_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to release seat"))?;
    Ok(())
}
