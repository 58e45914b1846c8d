//! Newtype wrappers around `i64` primary keys for all domain entities.
//!
//! Using distinct types prevents accidentally passing a `SeatId` where a
//! `TripId` is expected. When the `sqlx` feature is enabled, each ID type
//! also implements `sqlx::Type`, `sqlx::Encode` and `sqlx::Decode` for
//! PostgreSQL `BIGINT` columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around a `BIGSERIAL` key.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw key.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the inner key.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        #[cfg(feature = "sqlx")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl sqlx::postgres::PgHasArrayType for $name {
            fn array_type_info() -> sqlx::postgres::PgTypeInfo {
                <i64 as sqlx::postgres::PgHasArrayType>::array_type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }
    };
}

define_id!(
    /// Back-office user account.
    UserId
);

define_id!(
    /// Natural person (identity document holder).
    PersonId
);

define_id!(
    /// Billing customer.
    CustomerId
);

define_id!(
    /// Passenger profile linked to a person.
    PassengerId
);

define_id!(
    /// Company employee.
    EmployeeId
);

define_id!(
    /// Transport company.
    CompanyId
);

define_id!(
    /// City or town.
    LocalityId
);

define_id!(
    /// Agency, terminal or roadside stop.
    StopId
);

define_id!(
    /// Bus.
    BusId
);

define_id!(
    /// Seat inside a bus.
    SeatId
);

define_id!(
    /// Route.
    RouteId
);

define_id!(
    /// Ordered stop on a route.
    RouteStopId
);

define_id!(
    /// Weekly departure schedule of a route.
    ScheduleId
);

define_id!(
    /// Dated trip.
    TripId
);

define_id!(
    /// Customer reservation grouping tickets.
    ReservationId
);

define_id!(
    /// Passenger ticket.
    TicketId
);

define_id!(
    /// Parcel shipment.
    ParcelId
);

define_id!(
    /// Invoice document type.
    DocumentTypeId
);

define_id!(
    /// Fiscal stamp (timbrado).
    FiscalStampId
);

define_id!(
    /// Invoice header.
    InvoiceId
);

define_id!(
    /// Invoice line.
    InvoiceLineId
);

define_id!(
    /// Invoice change-history entry.
    InvoiceHistoryId
);

define_id!(
    /// Cash register.
    CashRegisterId
);

define_id!(
    /// Open/close cycle of a cash register.
    RegisterSessionId
);

define_id!(
    /// Money movement inside a register session.
    RegisterTransactionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = SeatId::new(42);
        assert_eq!(id.to_string(), "42");
        let parsed: SeatId = " 42 ".parse().expect("should parse");
        assert_eq!(parsed, id);
        assert!("forty-two".parse::<SeatId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&TripId::new(7)).expect("serialize");
        assert_eq!(json, "7");
        let parsed: TripId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(parsed.get(), 7);
    }
}
