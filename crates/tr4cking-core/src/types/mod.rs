//! Core type definitions used across the Tr4cking workspace.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::Guaranies;
pub use pagination::{PageRequest, PageResponse};
