//! Trip handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{PageResponse, TripId};
use tr4cking_database::repositories::TripFilter;
use tr4cking_entity::fleet::TripSeat;
use tr4cking_entity::trip::{BulkTripIds, Trip, TripInput};

use crate::dto::response::UpdatedResponse;
use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/trips
pub async fn list_trips(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<TripFilter>,
) -> ApiResult<PageResponse<Trip>> {
    dto::ok(state.trip_service.list(&auth, &filter, &page).await?)
}

/// GET /api/trips/{id}
pub async fn get_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TripId>,
) -> ApiResult<Trip> {
    dto::ok(state.trip_service.get(&auth, id).await?)
}

/// POST /api/trips
pub async fn create_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<TripInput>,
) -> Created<Trip> {
    dto::created(state.trip_service.create(&auth, &input).await?)
}

/// PUT /api/trips/{id}
pub async fn update_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TripId>,
    ValidatedJson(input): ValidatedJson<TripInput>,
) -> ApiResult<Trip> {
    dto::ok(state.trip_service.update(&auth, id, &input).await?)
}

/// DELETE /api/trips/{id}
pub async fn delete_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TripId>,
) -> NoContent {
    state.trip_service.delete(&auth, id).await?;
    dto::no_content()
}

/// GET /api/trips/{id}/seats
pub async fn trip_seats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TripId>,
) -> ApiResult<Vec<TripSeat>> {
    dto::ok(state.trip_service.seats(&auth, id).await?)
}

/// POST /api/trips/activate
pub async fn activate_trips(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<BulkTripIds>,
) -> ApiResult<UpdatedResponse> {
    let updated = state.trip_service.set_active(&auth, &body.ids, true).await?;
    dto::ok(UpdatedResponse { updated })
}

/// POST /api/trips/deactivate
pub async fn deactivate_trips(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<BulkTripIds>,
) -> ApiResult<UpdatedResponse> {
    let updated = state.trip_service.set_active(&auth, &body.ids, false).await?;
    dto::ok(UpdatedResponse { updated })
}
