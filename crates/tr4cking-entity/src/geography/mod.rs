//! Localities and the stops located in them.

pub mod locality;
pub mod stop;

pub use locality::{Locality, LocalityInput};
pub use stop::{Stop, StopInput, StopKind};
