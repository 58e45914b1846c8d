//! Custom Axum extractors.

pub mod auth;
pub mod pagination;
pub mod validated;

pub use auth::AuthUser;
pub use pagination::{Pagination, PaginationParams};
pub use validated::{QueryFilter, ValidatedJson};
