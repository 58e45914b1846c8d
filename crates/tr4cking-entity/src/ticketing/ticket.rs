//! Passenger tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{PassengerId, ReservationId, SeatId, TicketId, TripId};

/// A ticket for one seat on one trip.
///
/// While a ticket exists its seat is `occupied`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: TicketId,
    pub reservation_id: Option<ReservationId>,
    pub trip_id: TripId,
    pub seat_id: SeatId,
    pub passenger_id: PassengerId,
    pub issued_at: DateTime<Utc>,
}

/// Issue or replace payload for a ticket.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TicketInput {
    pub reservation_id: Option<ReservationId>,
    pub trip_id: TripId,
    pub seat_id: SeatId,
    pub passenger_id: PassengerId,
}

impl Ticket {
    /// Whether replacing this ticket with `input` moves it to another seat.
    pub fn changes_seat(&self, input: &TicketInput) -> bool {
        self.seat_id != input.seat_id || self.trip_id != input.trip_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_seat() {
        let ticket = Ticket {
            id: TicketId::new(1),
            reservation_id: None,
            trip_id: TripId::new(1),
            seat_id: SeatId::new(5),
            passenger_id: PassengerId::new(1),
            issued_at: Utc::now(),
        };
        let same = TicketInput {
            reservation_id: Some(ReservationId::new(2)),
            trip_id: TripId::new(1),
            seat_id: SeatId::new(5),
            passenger_id: PassengerId::new(3),
        };
        assert!(!ticket.changes_seat(&same));
        let moved = TicketInput {
            seat_id: SeatId::new(6),
            ..same
        };
        assert!(ticket.changes_seat(&moved));
    }
}
