//! Document type and fiscal stamp repositories.

use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{DocumentTypeId, FiscalStampId, PageRequest, PageResponse};
use tr4cking_entity::invoice::{DocumentType, DocumentTypeInput, FiscalStamp, FiscalStampInput};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Repository for document types.
#[derive(Debug, Clone)]
pub struct DocumentTypeRepository {
    pool: PgPool,
}

impl DocumentTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: DocumentTypeId) -> AppResult<Option<DocumentType>> {
        sqlx::query_as::<_, DocumentType>("SELECT * FROM document_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find document type"))
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<DocumentType>> {
        sqlx::query_as::<_, DocumentType>("SELECT * FROM document_types WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find document type by code"))
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<DocumentType>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_types")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count document types"))?;

        let items = sqlx::query_as::<_, DocumentType>(
            "SELECT * FROM document_types ORDER BY code LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list document types"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &DocumentTypeInput) -> AppResult<DocumentType> {
        sqlx::query_as::<_, DocumentType>(
            "INSERT INTO document_types (code, name, description, requires_registered_customer) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.requires_registered_customer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create document type"))
    }

    pub async fn update(
        &self,
        id: DocumentTypeId,
        input: &DocumentTypeInput,
    ) -> AppResult<DocumentType> {
        sqlx::query_as::<_, DocumentType>(
            "UPDATE document_types SET code = $2, name = $3, description = $4, \
                                       requires_registered_customer = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.requires_registered_customer)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update document type"))?
        .ok_or_else(|| AppError::not_found(format!("Document type {id} not found")))
    }

    pub async fn delete(&self, id: DocumentTypeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM document_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete document type"))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Repository for fiscal stamps.
#[derive(Debug, Clone)]
pub struct FiscalStampRepository {
    pool: PgPool,
}

impl FiscalStampRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: FiscalStampId) -> AppResult<Option<FiscalStamp>> {
        sqlx::query_as::<_, FiscalStamp>("SELECT * FROM fiscal_stamps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find fiscal stamp"))
    }

    pub async fn find_by_number(&self, number: &str) -> AppResult<Option<FiscalStamp>> {
        sqlx::query_as::<_, FiscalStamp>("SELECT * FROM fiscal_stamps WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find fiscal stamp by number"))
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<FiscalStamp>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fiscal_stamps")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count fiscal stamps"))?;

        let items = sqlx::query_as::<_, FiscalStamp>(
            "SELECT * FROM fiscal_stamps ORDER BY valid_until DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list fiscal stamps"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &FiscalStampInput) -> AppResult<FiscalStamp> {
        sqlx::query_as::<_, FiscalStamp>(
            "INSERT INTO fiscal_stamps (number, valid_from, valid_until, active) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&input.number)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create fiscal stamp"))
    }

    pub async fn update(
        &self,
        id: FiscalStampId,
        input: &FiscalStampInput,
    ) -> AppResult<FiscalStamp> {
        sqlx::query_as::<_, FiscalStamp>(
            "UPDATE fiscal_stamps SET number = $2, valid_from = $3, valid_until = $4, active = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.number)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update fiscal stamp"))?
        .ok_or_else(|| AppError::not_found(format!("Fiscal stamp {id} not found")))
    }

    pub async fn delete(&self, id: FiscalStampId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM fiscal_stamps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete fiscal stamp"))?;
        Ok(result.rows_affected() > 0)
    }
}
