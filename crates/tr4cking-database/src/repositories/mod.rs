//! Concrete PostgreSQL repositories, one per aggregate.

pub mod bus;
pub mod cash_register;
pub mod company;
pub mod customer;
pub mod dashboard;
pub mod employee;
pub mod fiscal;
pub mod invoice;
pub mod locality;
pub mod parcel;
pub mod passenger;
pub mod person;
pub mod reservation;
pub mod route;
pub mod seat;
pub mod stop;
pub mod ticket;
pub mod trip;
pub mod user;

pub use bus::{BusFilter, BusRepository};
pub use cash_register::CashRegisterRepository;
pub use company::CompanyRepository;
pub use customer::CustomerRepository;
pub use dashboard::DashboardRepository;
pub use employee::{EmployeeFilter, EmployeeRepository};
pub use fiscal::{DocumentTypeRepository, FiscalStampRepository};
pub use invoice::{InvoiceDraft, InvoiceFilter, InvoiceRepository};
pub use locality::LocalityRepository;
pub use parcel::{ParcelFilter, ParcelRepository};
pub use passenger::PassengerRepository;
pub use person::{PersonRepository, SearchFilter};
pub use reservation::{ReservationFilter, ReservationRepository};
pub use route::{
    RouteChildFilter, RouteFilter, RouteRepository, RouteStopRepository, ScheduleRepository,
};
pub use seat::{SeatFilter, SeatRepository};
pub use stop::{StopFilter, StopRepository};
pub use ticket::{TicketFilter, TicketRepository};
pub use trip::{TripFilter, TripRepository};
pub use user::UserRepository;
