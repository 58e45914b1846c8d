//! # tr4cking-entity
//!
//! Domain entity models for the Tr4cking back office. Every struct in this
//! crate represents a database table row, a write payload for one, or a
//! domain value object. Row structs derive `sqlx::FromRow`; write payloads
//! derive `validator::Validate` so the HTTP layer can check field
//! constraints before any query runs.
//!
//! Domain rules that do not need the database (seat transitions, VAT
//! totals, weekday masks, parcel counts, seat maps) live next to the types
//! they govern and are unit tested here.

pub mod fleet;
pub mod geography;
pub mod invoice;
pub mod parcel;
pub mod people;
pub mod register;
pub mod route;
pub mod ticketing;
pub mod trip;
pub mod user;
