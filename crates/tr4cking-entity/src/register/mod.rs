//! Cash registers, their sessions and cash movements.

pub mod dashboard;
pub mod model;
pub mod session;
pub mod transaction;

pub use dashboard::DashboardStats;
pub use model::{CashRegister, CashRegisterInput, OpenRegister, RegisterStatus};
pub use session::{CloseRegister, OpenSession, RegisterSession, SessionClosing, expected_balance};
pub use transaction::{RegisterTransaction, TransactionInput, TransactionKind};
