//! Passenger repository implementation.

use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, PassengerId, PersonId};
use tr4cking_entity::people::{PassengerInput, PassengerView};

use super::person::SearchFilter;
use crate::error::{map_delete_error, map_read_error, map_write_error};

const VIEW_SELECT: &str = "SELECT pa.id, pa.person_id, pa.created_at, \
                                  pe.document_number, pe.first_name, pe.last_name \
                           FROM passengers pa JOIN persons pe ON pe.id = pa.person_id";

/// Repository for passengers. Reads always join the person.
#[derive(Debug, Clone)]
pub struct PassengerRepository {
    pool: PgPool,
}

impl PassengerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: PassengerId) -> AppResult<Option<PassengerView>> {
        sqlx::query_as::<_, PassengerView>(&format!("{VIEW_SELECT} WHERE pa.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find passenger"))
    }

    pub async fn find_by_person(&self, person_id: PersonId) -> AppResult<Option<PassengerView>> {
        sqlx::query_as::<_, PassengerView>(&format!("{VIEW_SELECT} WHERE pa.person_id = $1"))
            .bind(person_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find passenger by person"))
    }

    pub async fn list(
        &self,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PassengerView>> {
        const WHERE: &str = "WHERE ($1::TEXT IS NULL OR pe.document_number ILIKE $1 \
                             OR pe.first_name ILIKE $1 OR pe.last_name ILIKE $1)";
        let pattern = filter.pattern();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM passengers pa JOIN persons pe ON pe.id = pa.person_id {WHERE}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to count passengers"))?;

        let items = sqlx::query_as::<_, PassengerView>(&format!(
            "{VIEW_SELECT} {WHERE} ORDER BY pe.last_name, pe.first_name LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list passengers"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &PassengerInput) -> AppResult<PassengerView> {
        let id: PassengerId =
            sqlx::query_scalar("INSERT INTO passengers (person_id) VALUES ($1) RETURNING id")
                .bind(input.person_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_write_error(e, "Failed to create passenger"))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Passenger {id} vanished after insert")))
    }

    pub async fn update(
        &self,
        id: PassengerId,
        input: &PassengerInput,
    ) -> AppResult<PassengerView> {
        let result = sqlx::query("UPDATE passengers SET person_id = $2 WHERE id = $1")
            .bind(id)
            .bind(input.person_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Failed to update passenger"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Passenger {id} not found")));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Passenger {id} not found")))
    }

    pub async fn delete(&self, id: PassengerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM passengers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete passenger"))?;
        Ok(result.rows_affected() > 0)
    }
}
