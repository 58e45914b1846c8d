//! Recurring departures of a route.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{RouteId, ScheduleId};

use super::weekdays::Weekdays;

/// A recurring departure of a route.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: ScheduleId,
    pub route_id: RouteId,
    pub departure_time: NaiveTime,
    pub weekdays: Weekdays,
    pub active: bool,
}

impl Schedule {
    /// Whether this schedule departs on `date`.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.active && self.weekdays.includes_date(date)
    }
}

/// Create or replace payload for a schedule.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleInput {
    pub route_id: RouteId,
    pub departure_time: NaiveTime,
    #[serde(default)]
    pub weekdays: Weekdays,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_on() {
        let mut schedule = Schedule {
            id: ScheduleId::new(1),
            route_id: RouteId::new(1),
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            weekdays: "1111100".parse().unwrap(),
            active: true,
        };
        // 2024-06-03 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(schedule.runs_on(monday));
        assert!(!schedule.runs_on(sunday));
        schedule.active = false;
        assert!(!schedule.runs_on(monday));
    }

    #[test]
    fn test_input_default_weekdays() {
        let input: ScheduleInput =
            serde_json::from_str(r#"{"route_id": 1, "departure_time": "08:00:00"}"#).unwrap();
        assert_eq!(input.weekdays, Weekdays::ALL);
    }
}
