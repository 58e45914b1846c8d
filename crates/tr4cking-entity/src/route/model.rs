//! Route and route stop models.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{Guaranies, RouteId, RouteStopId, StopId};

/// A route between localities.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: RouteId,
    /// Display name, unique (`Asunción - Encarnación`).
    pub name: String,
    pub total_duration_hours: f64,
    pub distance_km: f64,
    /// Base fare in guaraníes.
    pub base_price: Guaranies,
    pub active: bool,
    /// Refreshed on every update.
    pub updated_at: DateTime<Utc>,
}

/// Create or replace payload for a route.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_duration_hours: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub distance_km: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub base_price: Guaranies,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A stop at a position along a route.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteStop {
    pub id: RouteStopId,
    pub route_id: RouteId,
    pub stop_id: StopId,
    /// 1-based order along the route.
    pub position: i32,
    pub departure_time: Option<NaiveTime>,
}

/// Create or replace payload for a route stop.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteStopInput {
    pub route_id: RouteId,
    pub stop_id: StopId,
    #[validate(range(min = 1))]
    pub position: i32,
    pub departure_time: Option<NaiveTime>,
}

/// A route stop joined with the stop and locality names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteStopView {
    pub id: RouteStopId,
    pub stop_id: StopId,
    pub position: i32,
    pub departure_time: Option<NaiveTime>,
    pub stop_name: String,
    pub locality_name: String,
}

/// A route with its stops in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: Route,
    pub stops: Vec<RouteStopView>,
}

impl RouteDetail {
    /// Locality of the first stop.
    pub fn origin(&self) -> Option<&str> {
        self.stops.first().map(|s| s.locality_name.as_str())
    }

    /// Locality of the last stop.
    pub fn destination(&self) -> Option<&str> {
        self.stops.last().map(|s| s.locality_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_values_rejected() {
        let input: RouteInput =
            serde_json::from_str(r#"{"name": "Asunción - Encarnación", "base_price": -1}"#)
                .unwrap();
        assert!(input.validate().is_err());

        let input: RouteInput =
            serde_json::from_str(r#"{"name": "Asunción - Encarnación", "distance_km": 370.5}"#)
                .unwrap();
        assert!(input.validate().is_ok());
        assert!(input.active);
    }

    #[test]
    fn test_detail_flattens_route() {
        let detail = RouteDetail {
            route: Route {
                id: RouteId::new(1),
                name: "Asunción - Villarrica".into(),
                total_duration_hours: 3.0,
                distance_km: 170.0,
                base_price: 60_000,
                active: true,
                updated_at: Utc::now(),
            },
            stops: vec![RouteStopView {
                id: RouteStopId::new(1),
                stop_id: StopId::new(1),
                position: 1,
                departure_time: NaiveTime::from_hms_opt(8, 0, 0),
                stop_name: "Terminal de Ómnibus Asunción".into(),
                locality_name: "Asunción".into(),
            }],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Asunción - Villarrica");
        assert_eq!(json["stops"][0]["position"], 1);
        assert_eq!(detail.origin(), Some("Asunción"));
    }
}
