//! Towns and cities served by the network.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::LocalityId;

/// A locality with optional coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Locality {
    pub id: LocalityId,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Create or replace payload for a locality.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocalityInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_range() {
        let input = LocalityInput {
            name: "Asunción".into(),
            latitude: Some(-25.28),
            longitude: Some(-57.63),
        };
        assert!(input.validate().is_ok());

        let bad = LocalityInput {
            latitude: Some(120.0),
            ..input
        };
        assert!(bad.validate().is_err());
    }
}
