//! Cash register model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use tr4cking_core::AppError;
use tr4cking_core::types::CashRegisterId;

use super::session::RegisterSession;

/// Whether a register currently has an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "register_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    Open,
    Closed,
}

impl RegisterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for RegisterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RegisterStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::validation(format!("Invalid register status: '{s}'"))),
        }
    }
}

/// A physical cash register (caja).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CashRegister {
    pub id: CashRegisterId,
    pub name: String,
    pub status: RegisterStatus,
    pub created_at: DateTime<Utc>,
}

/// Create or rename payload. Status only changes through open and close.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CashRegisterInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

/// An open register together with its running session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRegister {
    pub register: CashRegister,
    pub session: RegisterSession,
}
