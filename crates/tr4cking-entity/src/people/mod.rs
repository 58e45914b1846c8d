//! Persons and the roles they play: customers, passengers and employees.

pub mod customer;
pub mod employee;
pub mod passenger;
pub mod person;

pub use customer::{Customer, CustomerInput};
pub use employee::{Employee, EmployeeInput};
pub use passenger::{Passenger, PassengerInput, PassengerView};
pub use person::{Person, PersonInput};
