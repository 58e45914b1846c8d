//! Reservation and ticket handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{PageResponse, ReservationId, TicketId};
use tr4cking_database::repositories::{ReservationFilter, TicketFilter};
use tr4cking_entity::ticketing::{Reservation, ReservationInput, Ticket, TicketInput};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<ReservationFilter>,
) -> ApiResult<PageResponse<Reservation>> {
    dto::ok(state.ticketing_service.list_reservations(&auth, &filter, &page).await?)
}

/// GET /api/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ReservationId>,
) -> ApiResult<Reservation> {
    dto::ok(state.ticketing_service.get_reservation(&auth, id).await?)
}

/// POST /api/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ReservationInput>,
) -> Created<Reservation> {
    dto::created(state.ticketing_service.create_reservation(&auth, &input).await?)
}

/// PUT /api/reservations/{id}
pub async fn update_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ReservationId>,
    ValidatedJson(input): ValidatedJson<ReservationInput>,
) -> ApiResult<Reservation> {
    dto::ok(state.ticketing_service.update_reservation(&auth, id, &input).await?)
}

/// DELETE /api/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ReservationId>,
) -> NoContent {
    state.ticketing_service.delete_reservation(&auth, id).await?;
    dto::no_content()
}

/// GET /api/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<TicketFilter>,
) -> ApiResult<PageResponse<Ticket>> {
    dto::ok(state.ticketing_service.list_tickets(&auth, &filter, &page).await?)
}

/// GET /api/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TicketId>,
) -> ApiResult<Ticket> {
    dto::ok(state.ticketing_service.get_ticket(&auth, id).await?)
}

/// POST /api/tickets
pub async fn issue_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<TicketInput>,
) -> Created<Ticket> {
    dto::created(state.ticketing_service.issue(&auth, &input).await?)
}

/// PUT /api/tickets/{id}
pub async fn replace_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TicketId>,
    ValidatedJson(input): ValidatedJson<TicketInput>,
) -> ApiResult<Ticket> {
    dto::ok(state.ticketing_service.replace(&auth, id, &input).await?)
}

/// DELETE /api/tickets/{id}
///
/// Cancels the ticket and releases its seat; returns the removed ticket.
pub async fn cancel_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TicketId>,
) -> ApiResult<Ticket> {
    dto::ok(state.ticketing_service.cancel(&auth, id).await?)
}
