//! Company staff, optionally linked to a login account.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{CompanyId, EmployeeId, PersonId, UserId};

/// An employee of a transport company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: EmployeeId,
    pub person_id: PersonId,
    /// Login account, at most one employee per user.
    pub user_id: Option<UserId>,
    pub company_id: CompanyId,
    pub position: String,
    pub hired_on: NaiveDate,
}

/// Create or replace payload for an employee.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeInput {
    pub person_id: PersonId,
    pub user_id: Option<UserId>,
    pub company_id: CompanyId,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    pub hired_on: NaiveDate,
}
