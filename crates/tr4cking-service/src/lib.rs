//! # tr4cking-service
//!
//! Use-case services for the Tr4cking back office. Each service checks the
//! caller's permission, applies the cross-row rules a single repository
//! cannot see, and delegates persistence to the repositories.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod auth;
pub mod context;
pub mod dashboard;
pub mod fleet;
pub mod geography;
pub mod invoicing;
pub mod parcel;
pub mod people;
pub mod register;
pub mod route;
pub mod ticketing;
pub mod trip;
pub mod user;

pub use auth::{AuthService, LoginResult};
pub use context::RequestContext;
pub use dashboard::DashboardService;
pub use fleet::FleetService;
pub use geography::GeographyService;
pub use invoicing::InvoicingService;
pub use parcel::ParcelService;
pub use people::PeopleService;
pub use register::RegisterService;
pub use route::RouteService;
pub use ticketing::TicketingService;
pub use trip::TripService;
pub use user::UserService;

use std::fmt::Display;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;

/// Turn a missing row into a `NotFound` error naming the entity.
pub(crate) fn found<T>(row: Option<T>, entity: &str, id: impl Display) -> AppResult<T> {
    row.ok_or_else(|| AppError::not_found(format!("{entity} {id} not found")))
}

/// Turn an unsuccessful delete into a `NotFound` error naming the entity.
pub(crate) fn deleted(removed: bool, entity: &str, id: impl Display) -> AppResult<()> {
    if removed {
        Ok(())
    } else {
        Err(AppError::not_found(format!("{entity} {id} not found")))
    }
}
