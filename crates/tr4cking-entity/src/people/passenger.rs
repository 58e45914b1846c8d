//! Passengers: persons that travel on tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{PassengerId, PersonId};

/// Passenger row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Passenger {
    pub id: PassengerId,
    /// One passenger per person.
    pub person_id: PersonId,
    pub created_at: DateTime<Utc>,
}

/// Passenger joined with the person's identity, used in responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PassengerView {
    pub id: PassengerId,
    pub person_id: PersonId,
    pub created_at: DateTime<Utc>,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
}

/// Create or replace payload for a passenger.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PassengerInput {
    pub person_id: PersonId,
}
