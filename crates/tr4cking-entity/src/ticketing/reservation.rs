//! Customer reservations grouping tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use tr4cking_core::AppError;
use tr4cking_core::types::{CustomerId, ReservationId};

/// Lifecycle of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::validation(format!(
                "Invalid reservation status: '{s}'"
            ))),
        }
    }
}

/// A customer reservation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: ReservationId,
    pub customer_id: CustomerId,
    pub status: ReservationStatus,
    pub reserved_at: DateTime<Utc>,
}

/// Create or replace payload for a reservation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationInput {
    pub customer_id: CustomerId,
    #[serde(default = "default_status")]
    pub status: ReservationStatus,
}

fn default_status() -> ReservationStatus {
    ReservationStatus::Pending
}
