//! Seats and their occupancy state.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use tr4cking_core::AppError;
use tr4cking_core::types::{BusId, SeatId, TicketId};

/// Occupancy state of a seat.
///
/// `Occupied` is owned by ticketing: it is set when a ticket is issued on
/// the seat and cleared when that ticket is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seat_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SeatState {
    Available,
    Reserved,
    Occupied,
}

impl SeatState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
        }
    }

    /// Whether a ticket can be issued on a seat in this state.
    pub fn can_sell(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Check a manual (non-ticketing) state change.
    ///
    /// Only `available <-> reserved` is allowed; nobody may set or clear
    /// `occupied` by hand.
    pub fn check_manual_transition(&self, to: SeatState) -> Result<(), AppError> {
        if *self == to {
            return Ok(());
        }
        match (self, to) {
            (_, Self::Occupied) => Err(AppError::validation(
                "Seats become occupied only by issuing a ticket",
            )),
            (Self::Occupied, _) => Err(AppError::conflict(
                "Seat is occupied by a ticket; cancel the ticket to release it",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SeatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SeatState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            _ => Err(AppError::validation(format!("Invalid seat state: '{s}'"))),
        }
    }
}

/// Seat category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seat_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    SemiSleeper,
    Sleeper,
    Executive,
}

impl SeatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SemiSleeper => "semi_sleeper",
            Self::Sleeper => "sleeper",
            Self::Executive => "executive",
        }
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SeatKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semi_sleeper" => Ok(Self::SemiSleeper),
            "sleeper" => Ok(Self::Sleeper),
            "executive" => Ok(Self::Executive),
            _ => Err(AppError::validation(format!(
                "Invalid seat kind: '{s}'. Expected one of: semi_sleeper, sleeper, executive"
            ))),
        }
    }
}

/// A numbered seat on a bus.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seat {
    pub id: SeatId,
    pub bus_id: BusId,
    pub number: i32,
    pub state: SeatState,
    pub kind: Option<SeatKind>,
}

/// Editable seat attributes. Bus and number are fixed at provisioning.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeatUpdate {
    pub state: SeatState,
    pub kind: Option<SeatKind>,
}

/// A bus seat as seen from one trip.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripSeat {
    pub id: SeatId,
    pub number: i32,
    pub state: SeatState,
    pub kind: Option<SeatKind>,
    /// Ticket sold on this seat for the trip, if any.
    pub ticket_id: Option<TicketId>,
}

impl TripSeat {
    pub fn is_sold(&self) -> bool {
        self.ticket_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr4cking_core::error::ErrorKind;

    #[test]
    fn test_only_available_can_sell() {
        assert!(SeatState::Available.can_sell());
        assert!(!SeatState::Reserved.can_sell());
        assert!(!SeatState::Occupied.can_sell());
    }

    #[test]
    fn test_manual_transitions() {
        assert!(SeatState::Available.check_manual_transition(SeatState::Reserved).is_ok());
        assert!(SeatState::Reserved.check_manual_transition(SeatState::Available).is_ok());
        assert!(SeatState::Occupied.check_manual_transition(SeatState::Occupied).is_ok());

        let err = SeatState::Available
            .check_manual_transition(SeatState::Occupied)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = SeatState::Occupied
            .check_manual_transition(SeatState::Available)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("semi_sleeper".parse::<SeatKind>().unwrap(), SeatKind::SemiSleeper);
        assert!("cama".parse::<SeatKind>().is_err());
    }
}
