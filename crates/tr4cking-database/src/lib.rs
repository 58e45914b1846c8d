//! # tr4cking-database
//!
//! PostgreSQL connection management, embedded migrations and concrete
//! repository implementations for all Tr4cking entities.
//!
//! Writes that must keep seats, tickets, invoices and register sessions in
//! step run inside a single transaction in the owning repository.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
