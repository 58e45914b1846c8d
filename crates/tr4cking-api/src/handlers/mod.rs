//! Route handlers organized by domain.

pub mod auth;
pub mod dashboard;
pub mod fleet;
pub mod geography;
pub mod health;
pub mod invoicing;
pub mod parcel;
pub mod people;
pub mod register;
pub mod route;
pub mod ticketing;
pub mod trip;
pub mod user;
