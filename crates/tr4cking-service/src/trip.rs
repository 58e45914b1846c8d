//! Dated trips: scheduling checks, bulk activation and seat availability.

use std::sync::Arc;

use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, TripId};
use tr4cking_database::repositories::{
    BusRepository, ScheduleRepository, SeatRepository, TripFilter, TripRepository,
};
use tr4cking_entity::fleet::{BusStatus, TripSeat};
use tr4cking_entity::route::Schedule;
use tr4cking_entity::trip::{Trip, TripInput};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct TripService {
    trips: Arc<TripRepository>,
    schedules: Arc<ScheduleRepository>,
    buses: Arc<BusRepository>,
    seats: Arc<SeatRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl TripService {
    pub fn new(
        trips: Arc<TripRepository>,
        schedules: Arc<ScheduleRepository>,
        buses: Arc<BusRepository>,
        seats: Arc<SeatRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            trips,
            schedules,
            buses,
            seats,
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

    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &TripFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Trip>> {
        self.can_read(ctx)?;
        self.trips.list(filter, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: TripId) -> AppResult<Trip> {
        self.can_read(ctx)?;
        found(self.trips.find_by_id(id).await?, "Trip", id)
    }

    /// Schedule a new trip. The bus must be active.
    pub async fn create(&self, ctx: &RequestContext, input: &TripInput) -> AppResult<Trip> {
        self.can_write(ctx)?;
        self.check_schedule(input).await?;
        self.check_bus(input).await?;

        let trip = self.trips.create(input).await?;
        info!(
            trip_id = %trip.id,
            route_id = %trip.route_id,
            bus_id = %trip.bus_id,
            date = %trip.date,
            "Trip scheduled"
        );
        Ok(trip)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: TripId,
        input: &TripInput,
    ) -> AppResult<Trip> {
        self.can_write(ctx)?;
        let current = found(self.trips.find_by_id(id).await?, "Trip", id)?;
        self.check_schedule(input).await?;
        if current.bus_id != input.bus_id {
            self.check_bus(input).await?;
        }

        let trip = self.trips.update(id, input).await?;
        info!(trip_id = %trip.id, bus_id = %trip.bus_id, date = %trip.date, "Trip updated");
        Ok(trip)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: TripId) -> AppResult<()> {
        self.can_write(ctx)?;
        deleted(self.trips.delete(id).await?, "Trip", id)?;
        info!(trip_id = %id, "Trip deleted");
        Ok(())
    }

    /// Activate or deactivate many trips at once, returning how many changed.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        ids: &[TripId],
        active: bool,
    ) -> AppResult<u64> {
        self.can_write(ctx)?;
        let changed = self.trips.set_active(ids, active).await?;
        info!(requested = ids.len(), changed, active, "Trips bulk-updated");
        Ok(changed)
    }

    /// The trip's bus seats, each marked with the ticket sold on it, if any.
    pub async fn seats(&self, ctx: &RequestContext, id: TripId) -> AppResult<Vec<TripSeat>> {
        self.can_read(ctx)?;
        found(self.trips.find_by_id(id).await?, "Trip", id)?;
        self.seats.list_for_trip(id).await
    }

    /// The trip's bus must exist and be in service.
    async fn check_bus(&self, input: &TripInput) -> AppResult<()> {
        let bus = self
            .buses
            .find_by_id(input.bus_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Bus {} does not exist", input.bus_id)))?;
        if bus.status != BusStatus::Active {
            return Err(AppError::validation(format!(
                "Bus {} is {} and cannot be scheduled",
                bus.plate, bus.status
            )));
        }
        Ok(())
    }

    async fn check_schedule(&self, input: &TripInput) -> AppResult<()> {
        let Some(schedule_id) = input.schedule_id else {
            return Ok(());
        };
        let schedule = self.schedules.find_by_id(schedule_id).await?.ok_or_else(|| {
            AppError::validation(format!("Schedule {schedule_id} does not exist"))
        })?;
        check_schedule_fits(&schedule, input)
    }
}

/// A trip on a schedule must share its route and fall on one of its weekdays.
fn check_schedule_fits(schedule: &Schedule, input: &TripInput) -> AppResult<()> {
    if schedule.route_id != input.route_id {
        return Err(AppError::validation(format!(
            "Schedule {} belongs to route {}, not route {}",
            schedule.id, schedule.route_id, input.route_id
        )));
    }
    if !schedule.weekdays.includes_date(input.date) {
        return Err(AppError::validation(format!(
            "Schedule {} does not run on {} ({})",
            schedule.id,
            input.date,
            input.date.format("%A")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use tr4cking_core::types::{BusId, RouteId, ScheduleId};
    use tr4cking_entity::route::Weekdays;

    use super::*;

    fn schedule(weekdays: &str) -> Schedule {
        Schedule {
            id: ScheduleId::new(4),
            route_id: RouteId::new(1),
            departure_time: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            weekdays: weekdays.parse::<Weekdays>().unwrap(),
            active: true,
        }
    }

    fn input(route: i64, date: NaiveDate) -> TripInput {
        TripInput {
            route_id: RouteId::new(route),
            schedule_id: Some(ScheduleId::new(4)),
            bus_id: BusId::new(2),
            date,
            active: true,
            notes: None,
        }
    }

    #[test]
    fn test_weekday_must_match() {
        // 2024-06-03 is a Monday, 2024-06-08 a Saturday.
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let weekdays_only = schedule("1111100");

        assert!(check_schedule_fits(&weekdays_only, &input(1, monday)).is_ok());
        let err = check_schedule_fits(&weekdays_only, &input(1, saturday)).unwrap_err();
        assert!(err.message.contains("Saturday"));
    }

    #[test]
    fn test_route_must_match() {
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert!(check_schedule_fits(&schedule("1111111"), &input(9, monday)).is_err());
    }
}
