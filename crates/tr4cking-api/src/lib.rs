//! # tr4cking-api
//!
//! HTTP API layer for Tr4cking built on Axum.
//!
//! Provides the REST endpoints, middleware (request logging, CORS,
//! compression, timeouts), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod telemetry;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
