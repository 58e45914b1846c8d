//! Dated trips of a bus along a route.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{BusId, RouteId, ScheduleId, TripId};

/// A bus running a route on a date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    /// Recurring departure this trip instantiates, if any.
    pub schedule_id: Option<ScheduleId>,
    pub bus_id: BusId,
    pub date: NaiveDate,
    /// Inactive trips accept no new tickets.
    pub active: bool,
    pub notes: Option<String>,
}

/// Create or replace payload for a trip.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TripInput {
    pub route_id: RouteId,
    pub schedule_id: Option<ScheduleId>,
    pub bus_id: BusId,
    pub date: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Ids for bulk activation and deactivation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkTripIds {
    #[validate(length(min = 1, max = 500))]
    pub ids: Vec<TripId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_ids_must_not_be_empty() {
        let empty: BulkTripIds = serde_json::from_str(r#"{"ids": []}"#).unwrap();
        assert!(empty.validate().is_err());
        let some: BulkTripIds = serde_json::from_str(r#"{"ids": [1, 2, 3]}"#).unwrap();
        assert!(some.validate().is_ok());
        assert_eq!(some.ids[2], TripId::new(3));
    }

    #[test]
    fn test_trip_input_defaults() {
        let input: TripInput = serde_json::from_str(
            r#"{"route_id": 1, "bus_id": 2, "date": "2024-06-03"}"#,
        )
        .unwrap();
        assert!(input.active);
        assert!(input.schedule_id.is_none());
    }
}
