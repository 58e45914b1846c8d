//! Parcel shipments carried on trips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use tr4cking_core::AppError;
use tr4cking_core::types::{CustomerId, Guaranies, ParcelId, StopId, TripId};

/// What a shipment contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shipment_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentKind {
    Envelope,
    Package,
    Both,
}

impl ShipmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Envelope => "envelope",
            Self::Package => "package",
            Self::Both => "both",
        }
    }

    /// Check the item counts against the shipment kind.
    pub fn validate_counts(&self, envelopes: i32, packages: i32) -> Result<(), AppError> {
        if envelopes < 0 || packages < 0 {
            return Err(AppError::validation("Item counts cannot be negative"));
        }
        match self {
            Self::Envelope if envelopes < 1 || packages != 0 => Err(AppError::validation(
                "An envelope shipment needs at least one envelope and no packages",
            )),
            Self::Package if packages < 1 || envelopes != 0 => Err(AppError::validation(
                "A package shipment needs at least one package and no envelopes",
            )),
            Self::Both if envelopes < 1 || packages < 1 => Err(AppError::validation(
                "A mixed shipment needs at least one envelope and one package",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ShipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShipmentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "envelope" => Ok(Self::Envelope),
            "package" => Ok(Self::Package),
            "both" => Ok(Self::Both),
            _ => Err(AppError::validation(format!("Invalid shipment kind: '{s}'"))),
        }
    }
}

/// A parcel shipped on a trip.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Parcel {
    pub id: ParcelId,
    pub trip_id: TripId,
    pub customer_id: CustomerId,
    pub origin_stop_id: StopId,
    pub destination_stop_id: StopId,
    pub freight: Guaranies,
    pub sender: String,
    pub sender_document: String,
    pub contact_number: String,
    pub shipment_kind: ShipmentKind,
    pub envelope_count: i32,
    pub package_count: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace payload for a parcel.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_parcel"))]
pub struct ParcelInput {
    pub trip_id: TripId,
    pub customer_id: CustomerId,
    pub origin_stop_id: StopId,
    pub destination_stop_id: StopId,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub freight: Guaranies,
    #[validate(length(min = 1, max = 150))]
    pub sender: String,
    #[validate(length(min = 1, max = 20))]
    pub sender_document: String,
    #[validate(length(min = 1, max = 20))]
    pub contact_number: String,
    pub shipment_kind: ShipmentKind,
    #[serde(default)]
    pub envelope_count: i32,
    #[serde(default)]
    pub package_count: i32,
    pub description: Option<String>,
}

fn validate_parcel(input: &ParcelInput) -> Result<(), ValidationError> {
    if input.origin_stop_id == input.destination_stop_id {
        return Err(ValidationError::new("distinct_stops")
            .with_message("Origin and destination stops must differ".into()));
    }
    input
        .shipment_kind
        .validate_counts(input.envelope_count, input.package_count)
        .map_err(|e| ValidationError::new("shipment_counts").with_message(e.message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_rules() {
        assert!(ShipmentKind::Envelope.validate_counts(2, 0).is_ok());
        assert!(ShipmentKind::Envelope.validate_counts(0, 0).is_err());
        assert!(ShipmentKind::Envelope.validate_counts(1, 1).is_err());
        assert!(ShipmentKind::Package.validate_counts(0, 3).is_ok());
        assert!(ShipmentKind::Package.validate_counts(1, 3).is_err());
        assert!(ShipmentKind::Both.validate_counts(1, 1).is_ok());
        assert!(ShipmentKind::Both.validate_counts(0, 1).is_err());
        assert!(ShipmentKind::Both.validate_counts(-1, 1).is_err());
    }

    fn input() -> ParcelInput {
        ParcelInput {
            trip_id: TripId::new(1),
            customer_id: CustomerId::new(1),
            origin_stop_id: StopId::new(1),
            destination_stop_id: StopId::new(2),
            freight: 15_000,
            sender: "María González".into(),
            sender_document: "2345678".into(),
            contact_number: "0981123456".into(),
            shipment_kind: ShipmentKind::Package,
            envelope_count: 0,
            package_count: 1,
            description: None,
        }
    }

    #[test]
    fn test_input_schema_validation() {
        assert!(input().validate().is_ok());

        let same_stop = ParcelInput {
            destination_stop_id: StopId::new(1),
            ..input()
        };
        assert!(same_stop.validate().is_err());

        let wrong_counts = ParcelInput {
            envelope_count: 2,
            ..input()
        };
        assert!(wrong_counts.validate().is_err());
    }
}
