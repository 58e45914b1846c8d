//! Company, bus and seat handlers.
//!
//! Seats have no create or delete endpoint; they follow the bus capacity.

use axum::extract::{Path, State};

use tr4cking_core::types::{BusId, CompanyId, PageResponse, SeatId};
use tr4cking_database::repositories::{BusFilter, SearchFilter, SeatFilter};
use tr4cking_entity::fleet::{Bus, BusInput, Company, CompanyInput, Seat, SeatMap, SeatUpdate};

use crate::dto::request::SeatMapQuery;
use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/companies
pub async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<SearchFilter>,
) -> ApiResult<PageResponse<Company>> {
    dto::ok(state.fleet_service.list_companies(&auth, &filter, &page).await?)
}

/// GET /api/companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CompanyId>,
) -> ApiResult<Company> {
    dto::ok(state.fleet_service.get_company(&auth, id).await?)
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CompanyInput>,
) -> Created<Company> {
    dto::created(state.fleet_service.create_company(&auth, &input).await?)
}

/// PUT /api/companies/{id}
pub async fn update_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CompanyId>,
    ValidatedJson(input): ValidatedJson<CompanyInput>,
) -> ApiResult<Company> {
    dto::ok(state.fleet_service.update_company(&auth, id, &input).await?)
}

/// DELETE /api/companies/{id}
pub async fn delete_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CompanyId>,
) -> NoContent {
    state.fleet_service.delete_company(&auth, id).await?;
    dto::no_content()
}

/// GET /api/buses
pub async fn list_buses(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<BusFilter>,
) -> ApiResult<PageResponse<Bus>> {
    dto::ok(state.fleet_service.list_buses(&auth, &filter, &page).await?)
}

/// GET /api/buses/{id}
pub async fn get_bus(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BusId>,
) -> ApiResult<Bus> {
    dto::ok(state.fleet_service.get_bus(&auth, id).await?)
}

/// POST /api/buses
pub async fn create_bus(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<BusInput>,
) -> Created<Bus> {
    dto::created(state.fleet_service.create_bus(&auth, &input).await?)
}

/// PUT /api/buses/{id}
pub async fn update_bus(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BusId>,
    ValidatedJson(input): ValidatedJson<BusInput>,
) -> ApiResult<Bus> {
    dto::ok(state.fleet_service.update_bus(&auth, id, &input).await?)
}

/// DELETE /api/buses/{id}
pub async fn delete_bus(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BusId>,
) -> NoContent {
    state.fleet_service.delete_bus(&auth, id).await?;
    dto::no_content()
}

/// GET /api/buses/{id}/seats
pub async fn bus_seats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BusId>,
) -> ApiResult<Vec<Seat>> {
    dto::ok(state.fleet_service.bus_seats(&auth, id).await?)
}

/// GET /api/buses/{id}/seat-map?arrangement=2-2|2-1
pub async fn seat_map(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BusId>,
    QueryFilter(query): QueryFilter<SeatMapQuery>,
) -> ApiResult<SeatMap> {
    dto::ok(
        state
            .fleet_service
            .seat_map(&auth, id, query.arrangement)
            .await?,
    )
}

/// GET /api/seats
pub async fn list_seats(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<SeatFilter>,
) -> ApiResult<PageResponse<Seat>> {
    dto::ok(state.fleet_service.list_seats(&auth, &filter, &page).await?)
}

/// GET /api/seats/{id}
pub async fn get_seat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SeatId>,
) -> ApiResult<Seat> {
    dto::ok(state.fleet_service.get_seat(&auth, id).await?)
}

/// PUT /api/seats/{id}
pub async fn update_seat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SeatId>,
    ValidatedJson(input): ValidatedJson<SeatUpdate>,
) -> ApiResult<Seat> {
    dto::ok(state.fleet_service.update_seat(&auth, id, &input).await?)
}
