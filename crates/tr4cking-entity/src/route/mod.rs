//! Routes, their ordered stops and recurring departure schedules.

pub mod model;
pub mod schedule;
pub mod weekdays;

pub use model::{Route, RouteDetail, RouteInput, RouteStop, RouteStopInput, RouteStopView};
pub use schedule::{Schedule, ScheduleInput};
pub use weekdays::Weekdays;
