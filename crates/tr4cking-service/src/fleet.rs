//! Companies, buses and seats.
//!
//! Seats are provisioned by the bus: creating a bus creates seats
//! `1..=capacity` and a capacity change adds or removes seats to match.

use std::sync::Arc;

use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{BusId, CompanyId, PageRequest, PageResponse, SeatId};
use tr4cking_database::repositories::{
    BusFilter, BusRepository, CompanyRepository, SearchFilter, SeatFilter, SeatRepository,
};
use tr4cking_entity::fleet::{
    Bus, BusInput, Company, CompanyInput, Seat, SeatArrangement, SeatKind, SeatMap, SeatUpdate,
};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct FleetService {
    companies: Arc<CompanyRepository>,
    buses: Arc<BusRepository>,
    seats: Arc<SeatRepository>,
    rbac: Arc<RbacEnforcer>,
    default_seat_kind: SeatKind,
}

impl FleetService {
    pub fn new(
        companies: Arc<CompanyRepository>,
        buses: Arc<BusRepository>,
        seats: Arc<SeatRepository>,
        rbac: Arc<RbacEnforcer>,
        default_seat_kind: SeatKind,
    ) -> Self {
        Self {
            companies,
            buses,
            seats,
            rbac,
            default_seat_kind,
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

    // ── Companies ────────────────────────────────────────────

    pub async fn list_companies(
        &self,
        ctx: &RequestContext,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Company>> {
        self.can_read(ctx)?;
        self.companies.list(filter, page).await
    }

    pub async fn get_company(&self, ctx: &RequestContext, id: CompanyId) -> AppResult<Company> {
        self.can_read(ctx)?;
        found(self.companies.find_by_id(id).await?, "Company", id)
    }

    pub async fn create_company(
        &self,
        ctx: &RequestContext,
        input: &CompanyInput,
    ) -> AppResult<Company> {
        self.can_write(ctx)?;
        let company = self.companies.create(input).await?;
        info!(company_id = %company.id, name = %company.name, "Company created");
        Ok(company)
    }

    pub async fn update_company(
        &self,
        ctx: &RequestContext,
        id: CompanyId,
        input: &CompanyInput,
    ) -> AppResult<Company> {
        self.can_write(ctx)?;
        self.companies.update(id, input).await
    }

    pub async fn delete_company(&self, ctx: &RequestContext, id: CompanyId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.companies.delete(id).await?, "Company", id)
    }

    // ── Buses ────────────────────────────────────────────────

    pub async fn list_buses(
        &self,
        ctx: &RequestContext,
        filter: &BusFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Bus>> {
        self.can_read(ctx)?;
        self.buses.list(filter, page).await
    }

    pub async fn get_bus(&self, ctx: &RequestContext, id: BusId) -> AppResult<Bus> {
        self.can_read(ctx)?;
        found(self.buses.find_by_id(id).await?, "Bus", id)
    }

    /// Create a bus together with its seats.
    pub async fn create_bus(&self, ctx: &RequestContext, input: &BusInput) -> AppResult<Bus> {
        self.can_write(ctx)?;
        let bus = self
            .buses
            .create_with_seats(input, self.default_seat_kind)
            .await?;
        info!(
            bus_id = %bus.id,
            plate = %bus.plate,
            seats = bus.capacity,
            seat_kind = %self.default_seat_kind,
            "Bus created with seats"
        );
        Ok(bus)
    }

    /// Replace a bus, resizing its seats when the capacity changes.
    pub async fn update_bus(
        &self,
        ctx: &RequestContext,
        id: BusId,
        input: &BusInput,
    ) -> AppResult<Bus> {
        self.can_write(ctx)?;
        let bus = self
            .buses
            .update_with_resize(id, input, self.default_seat_kind)
            .await?;
        info!(bus_id = %bus.id, capacity = bus.capacity, "Bus updated");
        Ok(bus)
    }

    pub async fn delete_bus(&self, ctx: &RequestContext, id: BusId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.buses.delete(id).await?, "Bus", id)?;
        info!(bus_id = %id, "Bus deleted");
        Ok(())
    }

    pub async fn bus_seats(&self, ctx: &RequestContext, id: BusId) -> AppResult<Vec<Seat>> {
        self.can_read(ctx)?;
        found(self.buses.find_by_id(id).await?, "Bus", id)?;
        self.seats.list_by_bus(id).await
    }

    pub async fn seat_map(
        &self,
        ctx: &RequestContext,
        id: BusId,
        arrangement: SeatArrangement,
    ) -> AppResult<SeatMap> {
        let seats = self.bus_seats(ctx, id).await?;
        Ok(SeatMap::build(arrangement, &seats))
    }

    // ── Seats ────────────────────────────────────────────────

    pub async fn list_seats(
        &self,
        ctx: &RequestContext,
        filter: &SeatFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Seat>> {
        self.can_read(ctx)?;
        self.seats.list(filter, page).await
    }

    pub async fn get_seat(&self, ctx: &RequestContext, id: SeatId) -> AppResult<Seat> {
        self.can_read(ctx)?;
        found(self.seats.find_by_id(id).await?, "Seat", id)
    }

    /// Change a seat's kind, or move it between available and reserved.
    ///
    /// Counter staff hold seats by hand, so this needs `TicketSell`.
    pub async fn update_seat(
        &self,
        ctx: &RequestContext,
        id: SeatId,
        input: &SeatUpdate,
    ) -> AppResult<Seat> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::TicketSell)?;
        let seat = self.seats.update(id, input).await?;
        info!(seat_id = %id, state = %seat.state, "Seat updated");
        Ok(seat)
    }
}
