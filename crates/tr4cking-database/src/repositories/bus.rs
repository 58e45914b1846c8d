//! Bus repository. Buses own their seats, so bus writes also provision
//! or trim seats inside the same transaction.

use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{BusId, CompanyId, PageRequest, PageResponse};
use tr4cking_entity::fleet::{Bus, BusInput, BusStatus, SeatKind, plan_seat_resize};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Bus list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusFilter {
    pub company_id: Option<CompanyId>,
    pub status: Option<BusStatus>,
    /// Matches plate, brand or model.
    pub search: Option<String>,
}

/// Repository for buses and their seat provisioning.
#[derive(Debug, Clone)]
pub struct BusRepository {
    pool: PgPool,
}

impl BusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: BusId) -> AppResult<Option<Bus>> {
        sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find bus"))
    }

    pub async fn find_by_plate(&self, plate: &str) -> AppResult<Option<Bus>> {
        sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE plate = $1")
            .bind(plate)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find bus by plate"))
    }

    pub async fn list(
        &self,
        filter: &BusFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Bus>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR company_id = $1) \
                               AND ($2::bus_status IS NULL OR status = $2) \
                               AND ($3::TEXT IS NULL OR plate ILIKE $3 OR brand ILIKE $3 \
                                    OR model ILIKE $3)";
        let pattern = SearchFilter {
            search: filter.search.clone(),
        }
        .pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM buses {WHERE}"))
            .bind(filter.company_id)
            .bind(filter.status)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count buses"))?;

        let items = sqlx::query_as::<_, Bus>(&format!(
            "SELECT * FROM buses {WHERE} ORDER BY plate LIMIT $4 OFFSET $5"
        ))
        .bind(filter.company_id)
        .bind(filter.status)
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list buses"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Insert a bus and seats `1..=capacity`, all available, of `seat_kind`.
    pub async fn create_with_seats(&self, input: &BusInput, seat_kind: SeatKind) -> AppResult<Bus> {
        let mut tx = self.begin().await?;

        let bus = sqlx::query_as::<_, Bus>(
            "INSERT INTO buses (plate, brand, model, capacity, status, company_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&input.plate)
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.capacity)
        .bind(input.status)
        .bind(input.company_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create bus"))?;

        let seats: Vec<i32> = (1..=bus.capacity).collect();
        insert_seats(&mut tx, bus.id, &seats, seat_kind).await?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit bus creation"))?;
        debug!(bus_id = %bus.id, seats = seats.len(), "Provisioned seats");
        Ok(bus)
    }

    /// Replace a bus; a capacity change adds or removes seats.
    ///
    /// Seats above a reduced capacity are removed only when they are
    /// available and no ticket references them.
    pub async fn update_with_resize(
        &self,
        id: BusId,
        input: &BusInput,
        seat_kind: SeatKind,
    ) -> AppResult<Bus> {
        let mut tx = self.begin().await?;

        let current = sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_read_error(e, "Failed to lock bus"))?
            .ok_or_else(|| AppError::not_found(format!("Bus {id} not found")))?;

        if current.capacity != input.capacity {
            let existing: Vec<i32> =
                sqlx::query_scalar("SELECT number FROM seats WHERE bus_id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(|e| map_read_error(e, "Failed to load seats"))?;
            let plan = plan_seat_resize(&existing, input.capacity);

            if !plan.remove.is_empty() {
                let blocked: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM seats s \
                     WHERE s.bus_id = $1 AND s.number = ANY($2) \
                       AND (s.state <> 'available' \
                            OR EXISTS (SELECT 1 FROM tickets t WHERE t.seat_id = s.id))",
                )
                .bind(id)
                .bind(&plan.remove)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_read_error(e, "Failed to check removable seats"))?;
                if blocked > 0 {
                    return Err(AppError::conflict(format!(
                        "Cannot reduce capacity to {}: {blocked} seat(s) above it are reserved or sold",
                        input.capacity
                    )));
                }
                sqlx::query("DELETE FROM seats WHERE bus_id = $1 AND number = ANY($2)")
                    .bind(id)
                    .bind(&plan.remove)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_delete_error(e, "Failed to remove seats"))?;
            }
            insert_seats(&mut tx, id, &plan.add, seat_kind).await?;
            debug!(
                bus_id = %id,
                added = plan.add.len(),
                removed = plan.remove.len(),
                "Resized seats"
            );
        }

        let bus = sqlx::query_as::<_, Bus>(
            "UPDATE buses SET plate = $2, brand = $3, model = $4, capacity = $5, status = $6, \
                              company_id = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.plate)
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.capacity)
        .bind(input.status)
        .bind(input.company_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update bus"))?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit bus update"))?;
        Ok(bus)
    }

    /// Delete a bus with its seats, trips and tickets.
    pub async fn delete(&self, id: BusId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM buses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete bus"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_read_error(e, "Failed to begin transaction"))
    }
}

async fn insert_seats(
    tx: &mut Transaction<'static, Postgres>,
    bus_id: BusId,
    numbers: &[i32],
    kind: SeatKind,
) -> AppResult<()> {
    if numbers.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO seats (bus_id, number, state, kind) \
         SELECT $1, n, 'available', $3 FROM UNNEST($2::INTEGER[]) AS n",
    )
    .bind(bus_id)
    .bind(numbers)
    .bind(kind)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to create seats"))?;
    Ok(())
}
