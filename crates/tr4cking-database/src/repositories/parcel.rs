//! Parcel repository implementation.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{CustomerId, PageRequest, PageResponse, ParcelId, TripId};
use tr4cking_entity::parcel::{Parcel, ParcelInput, ShipmentKind};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Parcel list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParcelFilter {
    pub trip_id: Option<TripId>,
    pub customer_id: Option<CustomerId>,
    pub shipment_kind: Option<ShipmentKind>,
}

/// Repository for parcels.
#[derive(Debug, Clone)]
pub struct ParcelRepository {
    pool: PgPool,
}

impl ParcelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: ParcelId) -> AppResult<Option<Parcel>> {
        sqlx::query_as::<_, Parcel>("SELECT * FROM parcels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find parcel"))
    }

    pub async fn list(
        &self,
        filter: &ParcelFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Parcel>> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR trip_id = $1) \
                               AND ($2::BIGINT IS NULL OR customer_id = $2) \
                               AND ($3::shipment_kind IS NULL OR shipment_kind = $3)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM parcels {WHERE}"))
            .bind(filter.trip_id)
            .bind(filter.customer_id)
            .bind(filter.shipment_kind)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count parcels"))?;

        let items = sqlx::query_as::<_, Parcel>(&format!(
            "SELECT * FROM parcels {WHERE} ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.trip_id)
        .bind(filter.customer_id)
        .bind(filter.shipment_kind)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list parcels"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &ParcelInput) -> AppResult<Parcel> {
        sqlx::query_as::<_, Parcel>(
            "INSERT INTO parcels (trip_id, customer_id, origin_stop_id, destination_stop_id, \
                                  freight, sender, sender_document, contact_number, \
                                  shipment_kind, envelope_count, package_count, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(input.trip_id)
        .bind(input.customer_id)
        .bind(input.origin_stop_id)
        .bind(input.destination_stop_id)
        .bind(input.freight)
        .bind(&input.sender)
        .bind(&input.sender_document)
        .bind(&input.contact_number)
        .bind(input.shipment_kind)
        .bind(input.envelope_count)
        .bind(input.package_count)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create parcel"))
    }

    pub async fn update(&self, id: ParcelId, input: &ParcelInput) -> AppResult<Parcel> {
        sqlx::query_as::<_, Parcel>(
            "UPDATE parcels SET trip_id = $2, customer_id = $3, origin_stop_id = $4, \
                                destination_stop_id = $5, freight = $6, sender = $7, \
                                sender_document = $8, contact_number = $9, shipment_kind = $10, \
                                envelope_count = $11, package_count = $12, description = $13, \
                                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.trip_id)
        .bind(input.customer_id)
        .bind(input.origin_stop_id)
        .bind(input.destination_stop_id)
        .bind(input.freight)
        .bind(&input.sender)
        .bind(&input.sender_document)
        .bind(&input.contact_number)
        .bind(input.shipment_kind)
        .bind(input.envelope_count)
        .bind(input.package_count)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update parcel"))?
        .ok_or_else(|| AppError::not_found(format!("Parcel {id} not found")))
    }

    pub async fn delete(&self, id: ParcelId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM parcels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete parcel"))?;
        Ok(result.rows_affected() > 0)
    }
}
