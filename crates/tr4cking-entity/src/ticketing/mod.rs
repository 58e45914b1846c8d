//! Reservations and tickets.

pub mod reservation;
pub mod ticket;

pub use reservation::{Reservation, ReservationInput, ReservationStatus};
pub use ticket::{Ticket, TicketInput};
