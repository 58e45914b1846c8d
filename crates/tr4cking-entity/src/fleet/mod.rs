//! Companies, buses and the seats provisioned for them.

pub mod bus;
pub mod company;
pub mod seat;
pub mod seat_map;

pub use bus::{Bus, BusInput, BusStatus, SeatResizePlan, plan_seat_resize};
pub use company::{Company, CompanyInput};
pub use seat::{Seat, SeatKind, SeatState, SeatUpdate, TripSeat};
pub use seat_map::{SeatArrangement, SeatCell, SeatMap};
