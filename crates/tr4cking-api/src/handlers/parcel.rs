//! Parcel shipment handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{PageResponse, ParcelId};
use tr4cking_database::repositories::ParcelFilter;
use tr4cking_entity::parcel::{Parcel, ParcelInput};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/parcels
pub async fn list_parcels(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<ParcelFilter>,
) -> ApiResult<PageResponse<Parcel>> {
    dto::ok(state.parcel_service.list(&auth, &filter, &page).await?)
}

/// GET /api/parcels/{id}
pub async fn get_parcel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ParcelId>,
) -> ApiResult<Parcel> {
    dto::ok(state.parcel_service.get(&auth, id).await?)
}

/// POST /api/parcels
pub async fn create_parcel(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ParcelInput>,
) -> Created<Parcel> {
    dto::created(state.parcel_service.create(&auth, &input).await?)
}

/// PUT /api/parcels/{id}
pub async fn update_parcel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ParcelId>,
    ValidatedJson(input): ValidatedJson<ParcelInput>,
) -> ApiResult<Parcel> {
    dto::ok(state.parcel_service.update(&auth, id, &input).await?)
}

/// DELETE /api/parcels/{id}
pub async fn delete_parcel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ParcelId>,
) -> NoContent {
    state.parcel_service.delete(&auth, id).await?;
    dto::no_content()
}
