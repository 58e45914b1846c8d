//! Company repository implementation.

use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{CompanyId, PageRequest, PageResponse};
use tr4cking_entity::fleet::{Company, CompanyInput};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Repository for transport companies.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: CompanyId) -> AppResult<Option<Company>> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find company"))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Company>> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find company by name"))
    }

    pub async fn list(
        &self,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Company>> {
        const WHERE: &str = "WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR ruc ILIKE $1)";
        let pattern = filter.pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM companies {WHERE}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count companies"))?;

        let items = sqlx::query_as::<_, Company>(&format!(
            "SELECT * FROM companies {WHERE} ORDER BY name LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list companies"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &CompanyInput) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (name, ruc, phone, email, legal_address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.ruc)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.legal_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create company"))
    }

    pub async fn update(&self, id: CompanyId, input: &CompanyInput) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $2, ruc = $3, phone = $4, email = $5, legal_address = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.ruc)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.legal_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update company"))?
        .ok_or_else(|| AppError::not_found(format!("Company {id} not found")))
    }

    pub async fn delete(&self, id: CompanyId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete company"))?;
        Ok(result.rows_affected() > 0)
    }
}
