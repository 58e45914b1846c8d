//! Parcel shipments carried on trips.

use std::sync::Arc;

use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, ParcelId};
use tr4cking_database::repositories::{ParcelFilter, ParcelRepository};
use tr4cking_entity::parcel::{Parcel, ParcelInput};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct ParcelService {
    parcels: Arc<ParcelRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl ParcelService {
    pub fn new(parcels: Arc<ParcelRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { parcels, rbac }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &ParcelFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Parcel>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)?;
        self.parcels.list(filter, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: ParcelId) -> AppResult<Parcel> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)?;
        found(self.parcels.find_by_id(id).await?, "Parcel", id)
    }

    pub async fn create(&self, ctx: &RequestContext, input: &ParcelInput) -> AppResult<Parcel> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ParcelManage)?;
        let parcel = self.parcels.create(input).await?;
        info!(
            parcel_id = %parcel.id,
            trip_id = %parcel.trip_id,
            kind = %parcel.shipment_kind,
            "Parcel registered"
        );
        Ok(parcel)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ParcelId,
        input: &ParcelInput,
    ) -> AppResult<Parcel> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ParcelManage)?;
        self.parcels.update(id, input).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: ParcelId) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ParcelManage)?;
        deleted(self.parcels.delete(id).await?, "Parcel", id)
    }
}
