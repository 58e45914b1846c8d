//! Stops: terminals, roadside stops and ticket agencies.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use tr4cking_core::AppError;
use tr4cking_core::types::{CompanyId, LocalityId, StopId};

/// What kind of place a stop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stop_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    /// Company ticket office.
    Agency,
    /// Roadside stop.
    BusStop,
    /// Bus terminal.
    Terminal,
}

impl StopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agency => "agency",
            Self::BusStop => "bus_stop",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StopKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agency" => Ok(Self::Agency),
            "bus_stop" => Ok(Self::BusStop),
            "terminal" => Ok(Self::Terminal),
            _ => Err(AppError::validation(format!("Invalid stop kind: '{s}'"))),
        }
    }
}

/// A stop in a locality.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: StopId,
    /// Operating company for agencies.
    pub company_id: Option<CompanyId>,
    pub locality_id: LocalityId,
    pub kind: StopKind,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
}

/// Create or replace payload for a stop.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StopInput {
    pub company_id: Option<CompanyId>,
    pub locality_id: LocalityId,
    #[serde(default = "default_kind")]
    pub kind: StopKind,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_kind() -> StopKind {
    StopKind::BusStop
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&StopKind::BusStop).unwrap();
        assert_eq!(json, "\"bus_stop\"");
        assert_eq!("terminal".parse::<StopKind>().unwrap(), StopKind::Terminal);
    }

    #[test]
    fn test_input_defaults() {
        let input: StopInput =
            serde_json::from_str(r#"{"locality_id": 3, "name": "Parada Centro Villarrica"}"#)
                .unwrap();
        assert_eq!(input.kind, StopKind::BusStop);
        assert!(input.active);
        assert!(input.company_id.is_none());
    }
}
