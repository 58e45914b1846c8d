//! Route, route stop and schedule handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{PageResponse, RouteId, RouteStopId, ScheduleId};
use tr4cking_database::repositories::{RouteChildFilter, RouteFilter};
use tr4cking_entity::route::{
    Route, RouteDetail, RouteInput, RouteStop, RouteStopInput, RouteStopView, Schedule,
    ScheduleInput,
};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/routes
pub async fn list_routes(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<RouteFilter>,
) -> ApiResult<PageResponse<Route>> {
    dto::ok(state.route_service.list_routes(&auth, &filter, &page).await?)
}

/// GET /api/routes/{id}
///
/// Embeds the ordered stops.
pub async fn get_route(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteId>,
) -> ApiResult<RouteDetail> {
    dto::ok(state.route_service.get_route(&auth, id).await?)
}

/// POST /api/routes
pub async fn create_route(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<RouteInput>,
) -> Created<Route> {
    dto::created(state.route_service.create_route(&auth, &input).await?)
}

/// PUT /api/routes/{id}
pub async fn update_route(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteId>,
    ValidatedJson(input): ValidatedJson<RouteInput>,
) -> ApiResult<Route> {
    dto::ok(state.route_service.update_route(&auth, id, &input).await?)
}

/// DELETE /api/routes/{id}
pub async fn delete_route(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteId>,
) -> NoContent {
    state.route_service.delete_route(&auth, id).await?;
    dto::no_content()
}

/// GET /api/routes/{id}/stops
pub async fn route_stops(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteId>,
) -> ApiResult<Vec<RouteStopView>> {
    dto::ok(state.route_service.route_stops(&auth, id).await?)
}

/// GET /api/route-stops
pub async fn list_route_stops(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<RouteChildFilter>,
) -> ApiResult<PageResponse<RouteStop>> {
    dto::ok(state.route_service.list_route_stops(&auth, &filter, &page).await?)
}

/// GET /api/route-stops/{id}
pub async fn get_route_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteStopId>,
) -> ApiResult<RouteStop> {
    dto::ok(state.route_service.get_route_stop(&auth, id).await?)
}

/// POST /api/route-stops
pub async fn create_route_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<RouteStopInput>,
) -> Created<RouteStop> {
    dto::created(state.route_service.create_route_stop(&auth, &input).await?)
}

/// PUT /api/route-stops/{id}
pub async fn update_route_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteStopId>,
    ValidatedJson(input): ValidatedJson<RouteStopInput>,
) -> ApiResult<RouteStop> {
    dto::ok(state.route_service.update_route_stop(&auth, id, &input).await?)
}

/// DELETE /api/route-stops/{id}
pub async fn delete_route_stop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RouteStopId>,
) -> NoContent {
    state.route_service.delete_route_stop(&auth, id).await?;
    dto::no_content()
}

/// GET /api/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<RouteChildFilter>,
) -> ApiResult<PageResponse<Schedule>> {
    dto::ok(state.route_service.list_schedules(&auth, &filter, &page).await?)
}

/// GET /api/schedules/{id}
pub async fn get_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ScheduleId>,
) -> ApiResult<Schedule> {
    dto::ok(state.route_service.get_schedule(&auth, id).await?)
}

/// POST /api/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ScheduleInput>,
) -> Created<Schedule> {
    dto::created(state.route_service.create_schedule(&auth, &input).await?)
}

/// PUT /api/schedules/{id}
pub async fn update_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ScheduleId>,
    ValidatedJson(input): ValidatedJson<ScheduleInput>,
) -> ApiResult<Schedule> {
    dto::ok(state.route_service.update_schedule(&auth, id, &input).await?)
}

/// DELETE /api/schedules/{id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ScheduleId>,
) -> NoContent {
    state.route_service.delete_schedule(&auth, id).await?;
    dto::no_content()
}
