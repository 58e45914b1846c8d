//! Locality and stop handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{LocalityId, PageResponse, StopId};
use tr4cking_database::repositories::{SearchFilter, StopFilter};
use tr4cking_entity::geography::{Locality, LocalityInput, Stop, StopInput};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/localities
pub async fn list_localities(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<SearchFilter>,
) -> ApiResult<PageResponse<Locality>> {
    dto::ok(state.geography_service.list_localities(&auth, &filter, &page).await?)
}

/// GET /api/localities/{id}
pub async fn get_locality(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LocalityId>,
) -> ApiResult<Locality> {
    dto::ok(state.geography_service.get_locality(&auth, id).await?)
}

/// POST /api/localities
pub async fn create_locality(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<LocalityInput>,
) -> Created<Locality> {
    dto::created(state.geography_service.create_locality(&auth, &input).await?)
}

/// PUT /api/localities/{id}
pub async fn update_locality(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LocalityId>,
    ValidatedJson(input): ValidatedJson<LocalityInput>,
) -> ApiResult<Locality> {
    dto::ok(state.geography_service.update_locality(&auth, id, &input).await?)
}

/// DELETE /api/localities/{id}
pub async fn delete_locality(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LocalityId>,
) -> NoContent {
    state.geography_service.delete_locality(&auth, id).await?;
    dto::no_content()
}

/// GET /api/stops
pub async fn list_stops(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<StopFilter>,
) -> ApiResult<PageResponse<Stop>> {
    dto::ok(state.geography_service.list_stops(&auth, &filter, &page).await?)
}

/// GET /api/stops/{id}
pub async fn get_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StopId>,
) -> ApiResult<Stop> {
    dto::ok(state.geography_service.get_stop(&auth, id).await?)
}

/// POST /api/stops
pub async fn create_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<StopInput>,
) -> Created<Stop> {
    dto::created(state.geography_service.create_stop(&auth, &input).await?)
}

/// PUT /api/stops/{id}
pub async fn update_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StopId>,
    ValidatedJson(input): ValidatedJson<StopInput>,
) -> ApiResult<Stop> {
    dto::ok(state.geography_service.update_stop(&auth, id, &input).await?)
}

/// DELETE /api/stops/{id}
pub async fn delete_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StopId>,
) -> NoContent {
    state.geography_service.delete_stop(&auth, id).await?;
    dto::no_content()
}
