//! Customer repository implementation.

use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{CustomerId, PageRequest, PageResponse};
use tr4cking_entity::people::{Customer, CustomerInput};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Repository for customers.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find customer"))
    }

    pub async fn find_by_ruc(&self, ruc: &str) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE ruc = $1")
            .bind(ruc)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find customer by RUC"))
    }

    /// List customers, searching RUC and business name.
    pub async fn list(
        &self,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Customer>> {
        const WHERE: &str = "WHERE ($1::TEXT IS NULL OR ruc ILIKE $1 OR business_name ILIKE $1)";
        let pattern = filter.pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customers {WHERE}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count customers"))?;

        let items = sqlx::query_as::<_, Customer>(&format!(
            "SELECT * FROM customers {WHERE} ORDER BY business_name LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list customers"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &CustomerInput) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (person_id, ruc, dv, business_name, phone, address) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(input.person_id)
        .bind(&input.ruc)
        .bind(&input.dv)
        .bind(&input.business_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create customer"))
    }

    pub async fn update(&self, id: CustomerId, input: &CustomerInput) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "UPDATE customers SET person_id = $2, ruc = $3, dv = $4, business_name = $5, \
                                  phone = $6, address = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.person_id)
        .bind(&input.ruc)
        .bind(&input.dv)
        .bind(&input.business_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update customer"))?
        .ok_or_else(|| AppError::not_found(format!("Customer {id} not found")))
    }

    pub async fn delete(&self, id: CustomerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete customer"))?;
        Ok(result.rows_affected() > 0)
    }
}
