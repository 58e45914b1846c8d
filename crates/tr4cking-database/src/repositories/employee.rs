//! Employee repository implementation.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{CompanyId, EmployeeId, PageRequest, PageResponse, UserId};
use tr4cking_entity::people::{Employee, EmployeeInput};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Employee list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    pub company_id: Option<CompanyId>,
}

/// Repository for employees.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find employee"))
    }

    /// The employee record linked to a login account.
    pub async fn find_by_user(&self, user_id: UserId) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find employee by user"))
    }

    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Employee>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees WHERE ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(filter.company_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to count employees"))?;

        let items = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE ($1::BIGINT IS NULL OR company_id = $1) \
             ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(filter.company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list employees"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &EmployeeInput) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (person_id, user_id, company_id, position, hired_on) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(input.person_id)
        .bind(input.user_id)
        .bind(input.company_id)
        .bind(&input.position)
        .bind(input.hired_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create employee"))
    }

    pub async fn update(&self, id: EmployeeId, input: &EmployeeInput) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "UPDATE employees SET person_id = $2, user_id = $3, company_id = $4, \
                                  position = $5, hired_on = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.person_id)
        .bind(input.user_id)
        .bind(input.company_id)
        .bind(&input.position)
        .bind(input.hired_on)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update employee"))?
        .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))
    }

    pub async fn delete(&self, id: EmployeeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete employee"))?;
        Ok(result.rows_affected() > 0)
    }
}
