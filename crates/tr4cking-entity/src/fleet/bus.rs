//! Buses and seat provisioning rules.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use tr4cking_core::AppError;
use tr4cking_core::types::{BusId, CompanyId};

/// Largest bus the fleet can register.
pub const MAX_CAPACITY: i32 = 120;

/// Operational status of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bus_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BusStatus {
    Active,
    Maintenance,
    Inactive,
}

impl BusStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BusStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "maintenance" => Ok(Self::Maintenance),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::validation(format!("Invalid bus status: '{s}'"))),
        }
    }
}

/// A bus belonging to a company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bus {
    pub id: BusId,
    /// License plate, unique.
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Number of seats; seats `1..=capacity` exist for the bus.
    pub capacity: i32,
    pub status: BusStatus,
    pub company_id: CompanyId,
}

/// Create or replace payload for a bus.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BusInput {
    #[validate(length(min = 1, max = 10))]
    pub plate: String,
    #[validate(length(max = 50))]
    pub brand: Option<String>,
    #[validate(length(max = 50))]
    pub model: Option<String>,
    #[validate(range(min = 1, max = 120))]
    pub capacity: i32,
    #[serde(default = "default_status")]
    pub status: BusStatus,
    pub company_id: CompanyId,
}

fn default_status() -> BusStatus {
    BusStatus::Active
}

/// Seat numbers to add and remove when a bus's capacity changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatResizePlan {
    /// Missing numbers in `1..=new_capacity`.
    pub add: Vec<i32>,
    /// Existing numbers above `new_capacity`.
    pub remove: Vec<i32>,
}

impl SeatResizePlan {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Diff the existing seat numbers against `1..=new_capacity`.
pub fn plan_seat_resize(existing: &[i32], new_capacity: i32) -> SeatResizePlan {
    let add = (1..=new_capacity)
        .filter(|n| !existing.contains(n))
        .collect();
    let mut remove: Vec<i32> = existing
        .iter()
        .copied()
        .filter(|n| *n > new_capacity)
        .collect();
    remove.sort_unstable();
    SeatResizePlan { add, remove }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_adds_missing_numbers() {
        let existing: Vec<i32> = (1..=40).collect();
        let plan = plan_seat_resize(&existing, 44);
        assert_eq!(plan.add, vec![41, 42, 43, 44]);
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_shrink_removes_numbers_above_capacity() {
        let existing: Vec<i32> = (1..=40).collect();
        let plan = plan_seat_resize(&existing, 38);
        assert!(plan.add.is_empty());
        assert_eq!(plan.remove, vec![39, 40]);
    }

    #[test]
    fn test_fills_gaps_and_noop() {
        let plan = plan_seat_resize(&[1, 2, 4], 4);
        assert_eq!(plan.add, vec![3]);
        let full: Vec<i32> = (1..=10).collect();
        assert!(plan_seat_resize(&full, 10).is_empty());
    }

    #[test]
    fn test_capacity_bounds() {
        let input: BusInput = serde_json::from_str(
            r#"{"plate": "ABC123", "capacity": 121, "company_id": 1}"#,
        )
        .unwrap();
        assert_eq!(input.status, BusStatus::Active);
        assert!(input.validate().is_err());
        assert_eq!(MAX_CAPACITY, 120);
    }
}
