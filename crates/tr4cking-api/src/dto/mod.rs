//! Request and response DTOs that exist only at the HTTP boundary.

pub mod request;
pub mod response;

pub use response::{ApiResponse, ApiResult, Created, NoContent, created, no_content, ok};
