//! Classification of sqlx failures into [`AppError`] kinds.
//!
//! Constraint names come from the migration files; the ones users can
//! trip over get a readable message, the rest fall back to a generic one.

use sqlx::error::ErrorKind as DbErrorKind;

use tr4cking_core::error::{AppError, ErrorKind};

/// Readable message for a named constraint.
fn constraint_message(constraint: &str) -> Option<&'static str> {
    let message = match constraint {
        "persons_document_number_key" => "A person with this document number already exists",
        "users_username_key" => "Username already exists",
        "users_email_key" => "Email already in use",
        "customers_ruc_key" => "A customer with this RUC already exists",
        "passengers_person_id_key" => "This person is already a passenger",
        "companies_name_key" => "A company with this name already exists",
        "companies_ruc_key" => "A company with this RUC already exists",
        "employees_user_id_key" => "This user is already linked to an employee",
        "localities_name_key" => "A locality with this name already exists",
        "stops_name_key" => "A stop with this name already exists",
        "buses_plate_key" => "A bus with this plate already exists",
        "buses_capacity_check" => "Bus capacity must be between 1 and 120",
        "seats_bus_number_key" => "This bus already has a seat with that number",
        "routes_name_key" => "A route with this name already exists",
        "routes_non_negative_check" => "Route duration, distance and price cannot be negative",
        "route_stops_route_stop_key" => "This stop is already on the route",
        "route_stops_route_position_key" => "This position is already taken on the route",
        "schedules_route_departure_key" => "The route already departs at this time",
        "schedules_weekdays_check" => "Weekdays must be a 7-character mask with at least one day",
        "trips_bus_date_schedule_key" => "The bus already runs this schedule on that date",
        "tickets_trip_seat_key" => "This seat is already sold for the trip",
        "parcels_distinct_stops_check" => "Origin and destination stops must differ",
        "document_types_code_key" => "A document type with this code already exists",
        "fiscal_stamps_number_key" => "A fiscal stamp with this number already exists",
        "fiscal_stamps_range_check" => "valid_from must not be after valid_until",
        "cash_registers_name_key" => "A cash register with this name already exists",
        "register_sessions_one_open_key" => "The cash register is already open",
        "invoices_number_key" => "An invoice with this number already exists",
        _ => return None,
    };
    Some(message)
}

fn message_for(db_err: &dyn sqlx::error::DatabaseError, fallback: &str) -> String {
    db_err
        .constraint()
        .and_then(constraint_message)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Map an insert/update failure.
///
/// Unique violations become `Conflict`; foreign-key, check and not-null
/// violations become `Validation`; anything else is a `Database` error.
pub fn map_write_error(err: sqlx::Error, context: &str) -> AppError {
    let kind = match &err {
        sqlx::Error::Database(db_err) => match db_err.kind() {
            DbErrorKind::UniqueViolation => {
                Some((ErrorKind::Conflict, message_for(db_err.as_ref(), "Duplicate value")))
            }
            DbErrorKind::ForeignKeyViolation => Some((
                ErrorKind::Validation,
                message_for(db_err.as_ref(), "Referenced row does not exist"),
            )),
            DbErrorKind::CheckViolation | DbErrorKind::NotNullViolation => Some((
                ErrorKind::Validation,
                message_for(db_err.as_ref(), "Value violates a constraint"),
            )),
            _ => None,
        },
        sqlx::Error::RowNotFound => Some((ErrorKind::NotFound, format!("{context}: not found"))),
        _ => None,
    };
    match kind {
        Some((kind, message)) => AppError::with_source(kind, message, err),
        None => AppError::with_source(ErrorKind::Database, context.to_string(), err),
    }
}

/// Map a delete failure. Rows still referenced by a `RESTRICT` key are a
/// `Conflict`, not a validation problem.
pub fn map_delete_error(err: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.kind() == DbErrorKind::ForeignKeyViolation {
            return AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: the row is still referenced by other records"),
                err,
            );
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

/// Map a read failure.
pub fn map_read_error(err: sqlx::Error, context: &str) -> AppError {
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_constraints_have_messages() {
        assert_eq!(
            constraint_message("buses_plate_key"),
            Some("A bus with this plate already exists")
        );
        assert!(constraint_message("register_sessions_one_open_key").is_some());
        assert!(constraint_message("something_else").is_none());
    }

    #[test]
    fn test_non_database_errors_map_to_database_kind() {
        let err = map_write_error(sqlx::Error::PoolTimedOut, "Failed to create bus");
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "Failed to create bus");

        let err = map_write_error(sqlx::Error::RowNotFound, "Bus 3");
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = map_delete_error(sqlx::Error::PoolClosed, "Failed to delete stop");
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
