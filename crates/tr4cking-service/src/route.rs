//! Routes, their ordered stops and weekly schedules.

use std::sync::Arc;

use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, RouteId, RouteStopId, ScheduleId};
use tr4cking_database::repositories::{
    RouteChildFilter, RouteFilter, RouteRepository, RouteStopRepository, ScheduleRepository,
};
use tr4cking_entity::route::{
    Route, RouteDetail, RouteInput, RouteStop, RouteStopInput, RouteStopView, Schedule,
    ScheduleInput,
};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct RouteService {
    routes: Arc<RouteRepository>,
    route_stops: Arc<RouteStopRepository>,
    schedules: Arc<ScheduleRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl RouteService {
    pub fn new(
        routes: Arc<RouteRepository>,
        route_stops: Arc<RouteStopRepository>,
        schedules: Arc<ScheduleRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            routes,
            route_stops,
            schedules,
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

    // ── Routes ───────────────────────────────────────────────

    pub async fn list_routes(
        &self,
        ctx: &RequestContext,
        filter: &RouteFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Route>> {
        self.can_read(ctx)?;
        self.routes.list(filter, page).await
    }

    /// A route with its stops in travel order.
    pub async fn get_route(&self, ctx: &RequestContext, id: RouteId) -> AppResult<RouteDetail> {
        self.can_read(ctx)?;
        let route = found(self.routes.find_by_id(id).await?, "Route", id)?;
        let stops = self.routes.stops_of(id).await?;
        Ok(RouteDetail { route, stops })
    }

    pub async fn route_stops(
        &self,
        ctx: &RequestContext,
        id: RouteId,
    ) -> AppResult<Vec<RouteStopView>> {
        Ok(self.get_route(ctx, id).await?.stops)
    }

    pub async fn create_route(&self, ctx: &RequestContext, input: &RouteInput) -> AppResult<Route> {
        self.can_write(ctx)?;
        let route = self.routes.create(input).await?;
        info!(route_id = %route.id, name = %route.name, "Route created");
        Ok(route)
    }

    pub async fn update_route(
        &self,
        ctx: &RequestContext,
        id: RouteId,
        input: &RouteInput,
    ) -> AppResult<Route> {
        self.can_write(ctx)?;
        self.routes.update(id, input).await
    }

    pub async fn delete_route(&self, ctx: &RequestContext, id: RouteId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.routes.delete(id).await?, "Route", id)?;
        info!(route_id = %id, "Route deleted");
        Ok(())
    }

    // ── Route stops ──────────────────────────────────────────

    pub async fn list_route_stops(
        &self,
        ctx: &RequestContext,
        filter: &RouteChildFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RouteStop>> {
        self.can_read(ctx)?;
        self.route_stops.list(filter, page).await
    }

    pub async fn get_route_stop(
        &self,
        ctx: &RequestContext,
        id: RouteStopId,
    ) -> AppResult<RouteStop> {
        self.can_read(ctx)?;
        found(self.route_stops.find_by_id(id).await?, "Route stop", id)
    }

    pub async fn create_route_stop(
        &self,
        ctx: &RequestContext,
        input: &RouteStopInput,
    ) -> AppResult<RouteStop> {
        self.can_write(ctx)?;
        self.route_stops.create(input).await
    }

    pub async fn update_route_stop(
        &self,
        ctx: &RequestContext,
        id: RouteStopId,
        input: &RouteStopInput,
    ) -> AppResult<RouteStop> {
        self.can_write(ctx)?;
        self.route_stops.update(id, input).await
    }

    pub async fn delete_route_stop(&self, ctx: &RequestContext, id: RouteStopId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.route_stops.delete(id).await?, "Route stop", id)
    }

    // ── Schedules ────────────────────────────────────────────

    pub async fn list_schedules(
        &self,
        ctx: &RequestContext,
        filter: &RouteChildFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Schedule>> {
        self.can_read(ctx)?;
        self.schedules.list(filter, page).await
    }

    pub async fn get_schedule(&self, ctx: &RequestContext, id: ScheduleId) -> AppResult<Schedule> {
        self.can_read(ctx)?;
        found(self.schedules.find_by_id(id).await?, "Schedule", id)
    }

    pub async fn create_schedule(
        &self,
        ctx: &RequestContext,
        input: &ScheduleInput,
    ) -> AppResult<Schedule> {
        self.can_write(ctx)?;
        let schedule = self.schedules.create(input).await?;
        info!(
            schedule_id = %schedule.id,
            route_id = %schedule.route_id,
            weekdays = %schedule.weekdays,
            "Schedule created"
        );
        Ok(schedule)
    }

    pub async fn update_schedule(
        &self,
        ctx: &RequestContext,
        id: ScheduleId,
        input: &ScheduleInput,
    ) -> AppResult<Schedule> {
        self.can_write(ctx)?;
        self.schedules.update(id, input).await
    }

    pub async fn delete_schedule(&self, ctx: &RequestContext, id: ScheduleId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.schedules.delete(id).await?, "Schedule", id)
    }
}
