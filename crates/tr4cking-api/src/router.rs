//! Route definitions for the Tr4cking HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post, put};

use crate::handlers::{
    auth, dashboard, fleet, geography, health, invoicing, parcel, people, register, route,
    ticketing, trip, user,
};
use crate::state::AppState;

/// Build the `/api` router and thread the state through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(people_routes())
        .merge(geography_routes())
        .merge(fleet_routes())
        .merge(route_routes())
        .merge(trip_routes())
        .merge(ticketing_routes())
        .merge(parcel_routes())
        .merge(invoicing_routes())
        .merge(register_routes())
        .route("/dashboard", get(dashboard::stats))
        .route("/health", get(health::health));

    Router::new().nest("/api", api_routes).with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/users/{id}/password", put(user::set_password))
        .route("/roles", get(user::list_roles))
}

fn people_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/persons",
            get(people::list_persons).post(people::create_person),
        )
        .route(
            "/persons/{id}",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        .route(
            "/customers",
            get(people::list_customers).post(people::create_customer),
        )
        .route(
            "/customers/{id}",
            get(people::get_customer)
                .put(people::update_customer)
                .delete(people::delete_customer),
        )
        .route(
            "/passengers",
            get(people::list_passengers).post(people::create_passenger),
        )
        .route(
            "/passengers/{id}",
            get(people::get_passenger)
                .put(people::update_passenger)
                .delete(people::delete_passenger),
        )
        .route(
            "/employees",
            get(people::list_employees).post(people::create_employee),
        )
        .route(
            "/employees/{id}",
            get(people::get_employee)
                .put(people::update_employee)
                .delete(people::delete_employee),
        )
}

fn geography_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/localities",
            get(geography::list_localities).post(geography::create_locality),
        )
        .route(
            "/localities/{id}",
            get(geography::get_locality)
                .put(geography::update_locality)
                .delete(geography::delete_locality),
        )
        .route(
            "/stops",
            get(geography::list_stops).post(geography::create_stop),
        )
        .route(
            "/stops/{id}",
            get(geography::get_stop)
                .put(geography::update_stop)
                .delete(geography::delete_stop),
        )
}

fn fleet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(fleet::list_companies).post(fleet::create_company),
        )
        .route(
            "/companies/{id}",
            get(fleet::get_company)
                .put(fleet::update_company)
                .delete(fleet::delete_company),
        )
        .route("/buses", get(fleet::list_buses).post(fleet::create_bus))
        .route(
            "/buses/{id}",
            get(fleet::get_bus)
                .put(fleet::update_bus)
                .delete(fleet::delete_bus),
        )
        .route("/buses/{id}/seats", get(fleet::bus_seats))
        .route("/buses/{id}/seat-map", get(fleet::seat_map))
        .route("/seats", get(fleet::list_seats))
        .route("/seats/{id}", get(fleet::get_seat).put(fleet::update_seat))
}

fn route_routes() -> Router<AppState> {
    Router::new()
        .route("/routes", get(route::list_routes).post(route::create_route))
        .route(
            "/routes/{id}",
            get(route::get_route)
                .put(route::update_route)
                .delete(route::delete_route),
        )
        .route("/routes/{id}/stops", get(route::route_stops))
        .route(
            "/route-stops",
            get(route::list_route_stops).post(route::create_route_stop),
        )
        .route(
            "/route-stops/{id}",
            get(route::get_route_stop)
                .put(route::update_route_stop)
                .delete(route::delete_route_stop),
        )
        .route(
            "/schedules",
            get(route::list_schedules).post(route::create_schedule),
        )
        .route(
            "/schedules/{id}",
            get(route::get_schedule)
                .put(route::update_schedule)
                .delete(route::delete_schedule),
        )
}

fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(trip::list_trips).post(trip::create_trip))
        .route("/trips/activate", post(trip::activate_trips))
        .route("/trips/deactivate", post(trip::deactivate_trips))
        .route(
            "/trips/{id}",
            get(trip::get_trip)
                .put(trip::update_trip)
                .delete(trip::delete_trip),
        )
        .route("/trips/{id}/seats", get(trip::trip_seats))
}

fn ticketing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            get(ticketing::list_reservations).post(ticketing::create_reservation),
        )
        .route(
            "/reservations/{id}",
            get(ticketing::get_reservation)
                .put(ticketing::update_reservation)
                .delete(ticketing::delete_reservation),
        )
        .route(
            "/tickets",
            get(ticketing::list_tickets).post(ticketing::issue_ticket),
        )
        .route(
            "/tickets/{id}",
            get(ticketing::get_ticket)
                .put(ticketing::replace_ticket)
                .delete(ticketing::cancel_ticket),
        )
}

fn parcel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/parcels",
            get(parcel::list_parcels).post(parcel::create_parcel),
        )
        .route(
            "/parcels/{id}",
            get(parcel::get_parcel)
                .put(parcel::update_parcel)
                .delete(parcel::delete_parcel),
        )
}

fn invoicing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/document-types",
            get(invoicing::list_document_types).post(invoicing::create_document_type),
        )
        .route(
            "/document-types/{id}",
            get(invoicing::get_document_type)
                .put(invoicing::update_document_type)
                .delete(invoicing::delete_document_type),
        )
        .route(
            "/fiscal-stamps",
            get(invoicing::list_fiscal_stamps).post(invoicing::create_fiscal_stamp),
        )
        .route(
            "/fiscal-stamps/{id}",
            get(invoicing::get_fiscal_stamp)
                .put(invoicing::update_fiscal_stamp)
                .delete(invoicing::delete_fiscal_stamp),
        )
        .route(
            "/invoices",
            get(invoicing::list_invoices).post(invoicing::issue_invoice),
        )
        .route("/invoices/{id}", get(invoicing::get_invoice))
        .route("/invoices/{id}/void", post(invoicing::void_invoice))
        .route("/invoices/{id}/condition", put(invoicing::change_condition))
        .route("/invoices/{id}/history", get(invoicing::invoice_history))
}

fn register_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cash-registers",
            get(register::list_cash_registers).post(register::create_cash_register),
        )
        .route("/cash-registers/current", get(register::current_registers))
        .route(
            "/cash-registers/{id}",
            get(register::get_cash_register)
                .put(register::update_cash_register)
                .delete(register::delete_cash_register),
        )
        .route("/cash-registers/{id}/open", post(register::open_register))
        .route("/cash-registers/{id}/close", post(register::close_register))
        .route(
            "/cash-registers/{id}/sessions",
            get(register::register_sessions),
        )
        .route(
            "/register-sessions/{id}/transactions",
            get(register::session_transactions).post(register::add_transaction),
        )
}
