//! Localities and stops.

use std::sync::Arc;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{LocalityId, PageRequest, PageResponse, StopId};
use tr4cking_database::repositories::{LocalityRepository, SearchFilter, StopFilter, StopRepository};
use tr4cking_entity::geography::{Locality, LocalityInput, Stop, StopInput};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct GeographyService {
    localities: Arc<LocalityRepository>,
    stops: Arc<StopRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl GeographyService {
    pub fn new(
        localities: Arc<LocalityRepository>,
        stops: Arc<StopRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            localities,
            stops,
            rbac,
        }
    }

    fn can_read(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)
    }

    fn can_write(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)
    }

    pub async fn list_localities(
        &self,
        ctx: &RequestContext,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Locality>> {
        self.can_read(ctx)?;
        self.localities.list(filter, page).await
    }

    pub async fn get_locality(&self, ctx: &RequestContext, id: LocalityId) -> AppResult<Locality> {
        self.can_read(ctx)?;
        found(self.localities.find_by_id(id).await?, "Locality", id)
    }

    pub async fn create_locality(
        &self,
        ctx: &RequestContext,
        input: &LocalityInput,
    ) -> AppResult<Locality> {
        self.can_write(ctx)?;
        self.localities.create(input).await
    }

    pub async fn update_locality(
        &self,
        ctx: &RequestContext,
        id: LocalityId,
        input: &LocalityInput,
    ) -> AppResult<Locality> {
        self.can_write(ctx)?;
        self.localities.update(id, input).await
    }

    pub async fn delete_locality(&self, ctx: &RequestContext, id: LocalityId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.localities.delete(id).await?, "Locality", id)
    }

    pub async fn list_stops(
        &self,
        ctx: &RequestContext,
        filter: &StopFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Stop>> {
        self.can_read(ctx)?;
        self.stops.list(filter, page).await
    }

    pub async fn get_stop(&self, ctx: &RequestContext, id: StopId) -> AppResult<Stop> {
        self.can_read(ctx)?;
        found(self.stops.find_by_id(id).await?, "Stop", id)
    }

    pub async fn create_stop(&self, ctx: &RequestContext, input: &StopInput) -> AppResult<Stop> {
        self.can_write(ctx)?;
        self.stops.create(input).await
    }

    pub async fn update_stop(
        &self,
        ctx: &RequestContext,
        id: StopId,
        input: &StopInput,
    ) -> AppResult<Stop> {
        self.can_write(ctx)?;
        self.stops.update(id, input).await
    }

    pub async fn delete_stop(&self, ctx: &RequestContext, id: StopId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.stops.delete(id).await?, "Stop", id)
    }
}
