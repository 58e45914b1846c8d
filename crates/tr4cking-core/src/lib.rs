//! # tr4cking-core
//!
//! Core crate for the Tr4cking back office. Contains configuration
//! schemas, typed identifiers, pagination types, money helpers and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Tr4cking crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
