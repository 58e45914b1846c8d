//! Reservations and tickets.
//!
//! The seat bookkeeping for issuing, moving and cancelling tickets happens
//! inside the ticket repository's transactions; this layer authorizes and
//! logs.

use std::sync::Arc;

use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, ReservationId, TicketId};
use tr4cking_database::repositories::{
    ReservationFilter, ReservationRepository, TicketFilter, TicketRepository,
};
use tr4cking_entity::ticketing::{Reservation, ReservationInput, Ticket, TicketInput};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct TicketingService {
    reservations: Arc<ReservationRepository>,
    tickets: Arc<TicketRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl TicketingService {
    pub fn new(
        reservations: Arc<ReservationRepository>,
        tickets: Arc<TicketRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            reservations,
            tickets,
            rbac,
        }
    }

    fn can_read(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)
    }

    fn can_sell(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::TicketSell)
    }

    // ── Reservations ─────────────────────────────────────────

    pub async fn list_reservations(
        &self,
        ctx: &RequestContext,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        self.can_read(ctx)?;
        self.reservations.list(filter, page).await
    }

    pub async fn get_reservation(
        &self,
        ctx: &RequestContext,
        id: ReservationId,
    ) -> AppResult<Reservation> {
        self.can_read(ctx)?;
        found(self.reservations.find_by_id(id).await?, "Reservation", id)
    }

    pub async fn create_reservation(
        &self,
        ctx: &RequestContext,
        input: &ReservationInput,
    ) -> AppResult<Reservation> {
        self.can_sell(ctx)?;
        let reservation = self.reservations.create(input).await?;
        info!(
            reservation_id = %reservation.id,
            customer_id = %reservation.customer_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    pub async fn update_reservation(
        &self,
        ctx: &RequestContext,
        id: ReservationId,
        input: &ReservationInput,
    ) -> AppResult<Reservation> {
        self.can_sell(ctx)?;
        let reservation = self.reservations.update(id, input).await?;
        info!(reservation_id = %id, status = %reservation.status, "Reservation updated");
        Ok(reservation)
    }

    /// Deleting a reservation cascades to its tickets, which frees their seats.
    pub async fn delete_reservation(
        &self,
        ctx: &RequestContext,
        id: ReservationId,
    ) -> AppResult<()> {
        self.can_sell(ctx)?;
        deleted(self.reservations.delete(id).await?, "Reservation", id)
    }

    // ── Tickets ──────────────────────────────────────────────

    pub async fn list_tickets(
        &self,
        ctx: &RequestContext,
        filter: &TicketFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Ticket>> {
        self.can_read(ctx)?;
        self.tickets.list(filter, page).await
    }

    pub async fn get_ticket(&self, ctx: &RequestContext, id: TicketId) -> AppResult<Ticket> {
        self.can_read(ctx)?;
        found(self.tickets.find_by_id(id).await?, "Ticket", id)
    }

    /// Sell a seat on a trip. The seat becomes occupied.
    pub async fn issue(&self, ctx: &RequestContext, input: &TicketInput) -> AppResult<Ticket> {
        self.can_sell(ctx)?;
        let ticket = self.tickets.issue(input).await?;
        info!(
            ticket_id = %ticket.id,
            trip_id = %ticket.trip_id,
            seat_id = %ticket.seat_id,
            by = %ctx.username,
            "Ticket issued"
        );
        Ok(ticket)
    }

    /// Replace a ticket. A seat change frees the old seat and occupies the new one.
    pub async fn replace(
        &self,
        ctx: &RequestContext,
        id: TicketId,
        input: &TicketInput,
    ) -> AppResult<Ticket> {
        self.can_sell(ctx)?;
        let ticket = self.tickets.replace(id, input).await?;
        info!(ticket_id = %id, seat_id = %ticket.seat_id, by = %ctx.username, "Ticket updated");
        Ok(ticket)
    }

    /// Cancel a ticket. Its seat becomes available again.
    pub async fn cancel(&self, ctx: &RequestContext, id: TicketId) -> AppResult<Ticket> {
        self.can_sell(ctx)?;
        let ticket = found(self.tickets.cancel(id).await?, "Ticket", id)?;
        info!(
            ticket_id = %id,
            seat_id = %ticket.seat_id,
            by = %ctx.username,
            "Ticket cancelled, seat released"
        );
        Ok(ticket)
    }
}
