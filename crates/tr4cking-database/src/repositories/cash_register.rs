//! Cash register repository: registers, sessions and cash movements.

use sqlx::{PgPool, Postgres, Transaction};

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{
    CashRegisterId, EmployeeId, Guaranies, InvoiceId, PageRequest, PageResponse,
    RegisterSessionId,
};
use tr4cking_entity::register::{
    CashRegister, CashRegisterInput, OpenRegister, RegisterSession, RegisterStatus,
    RegisterTransaction, SessionClosing, TransactionInput, TransactionKind, expected_balance,
};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Repository for cash registers and everything booked on them.
#[derive(Debug, Clone)]
pub struct CashRegisterRepository {
    pool: PgPool,
}

impl CashRegisterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: CashRegisterId) -> AppResult<Option<CashRegister>> {
        sqlx::query_as::<_, CashRegister>("SELECT * FROM cash_registers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find cash register"))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<CashRegister>> {
        sqlx::query_as::<_, CashRegister>("SELECT * FROM cash_registers WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find cash register by name"))
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<CashRegister>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_registers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count cash registers"))?;

        let items = sqlx::query_as::<_, CashRegister>(
            "SELECT * FROM cash_registers ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list cash registers"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &CashRegisterInput) -> AppResult<CashRegister> {
        sqlx::query_as::<_, CashRegister>(
            "INSERT INTO cash_registers (name) VALUES ($1) RETURNING *",
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create cash register"))
    }

    pub async fn rename(
        &self,
        id: CashRegisterId,
        input: &CashRegisterInput,
    ) -> AppResult<CashRegister> {
        sqlx::query_as::<_, CashRegister>(
            "UPDATE cash_registers SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update cash register"))?
        .ok_or_else(|| AppError::not_found(format!("Cash register {id} not found")))
    }

    /// Delete a closed register. Registers with invoices cannot be deleted.
    pub async fn delete(&self, id: CashRegisterId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cash_registers WHERE id = $1 AND status = 'closed'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete cash register"))?;
        if result.rows_affected() == 0 && self.find_by_id(id).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Cash register {id} is open; close it before deleting"
            )));
        }
        Ok(result.rows_affected() > 0)
    }

    /// Open a closed register and start a session.
    pub async fn open(
        &self,
        id: CashRegisterId,
        employee_id: EmployeeId,
        opening_amount: Guaranies,
    ) -> AppResult<RegisterSession> {
        let mut tx = self.begin().await?;

        let register = lock_register(&mut tx, id).await?;
        if register.status == RegisterStatus::Open {
            return Err(AppError::conflict(format!(
                "Cash register '{}' is already open",
                register.name
            )));
        }

        let session = sqlx::query_as::<_, RegisterSession>(
            "INSERT INTO register_sessions (cash_register_id, opened_by, opening_amount) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(id)
        .bind(employee_id)
        .bind(opening_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to open register session"))?;

        set_status(&mut tx, id, RegisterStatus::Open).await?;
        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit register opening"))?;
        Ok(session)
    }

    /// Close an open register, computing the expected cash.
    pub async fn close(
        &self,
        id: CashRegisterId,
        employee_id: EmployeeId,
        closing_amount: Guaranies,
    ) -> AppResult<SessionClosing> {
        let mut tx = self.begin().await?;

        let register = lock_register(&mut tx, id).await?;
        if register.status == RegisterStatus::Closed {
            return Err(AppError::conflict(format!(
                "Cash register '{}' is not open",
                register.name
            )));
        }
        let session = lock_open_session(&mut tx, id).await?.ok_or_else(|| {
            AppError::internal(format!("Cash register {id} is open without a session"))
        })?;

        let (income, expense): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount) FILTER (WHERE kind = 'income'), 0)::BIGINT, \
                    COALESCE(SUM(amount) FILTER (WHERE kind = 'expense'), 0)::BIGINT \
             FROM register_transactions WHERE session_id = $1",
        )
        .bind(session.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to total register movements"))?;
        let expected = expected_balance(session.opening_amount, income, expense);

        let session = sqlx::query_as::<_, RegisterSession>(
            "UPDATE register_sessions SET closed_by = $2, closed_at = NOW(), \
                                          closing_amount = $3, expected_amount = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(session.id)
        .bind(employee_id)
        .bind(closing_amount)
        .bind(expected)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to close register session"))?;

        set_status(&mut tx, id, RegisterStatus::Closed).await?;
        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit register closing"))?;

        Ok(SessionClosing {
            session,
            income,
            expense,
            expected_amount: expected,
            closing_amount,
            difference: closing_amount - expected,
        })
    }

    /// Every open register with its running session, earliest opened first.
    pub async fn list_open(&self) -> AppResult<Vec<OpenRegister>> {
        let sessions = sqlx::query_as::<_, RegisterSession>(
            "SELECT * FROM register_sessions WHERE closed_at IS NULL ORDER BY opened_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list open sessions"))?;

        let mut open = Vec::with_capacity(sessions.len());
        for session in sessions {
            if let Some(register) = self.find_by_id(session.cash_register_id).await? {
                open.push(OpenRegister { register, session });
            }
        }
        Ok(open)
    }

    pub async fn find_session(&self, id: RegisterSessionId) -> AppResult<Option<RegisterSession>> {
        sqlx::query_as::<_, RegisterSession>("SELECT * FROM register_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find register session"))
    }

    /// Sessions of a register, newest first.
    pub async fn list_sessions(
        &self,
        id: CashRegisterId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RegisterSession>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM register_sessions WHERE cash_register_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_read_error(e, "Failed to count register sessions"))?;

        let items = sqlx::query_as::<_, RegisterSession>(
            "SELECT * FROM register_sessions WHERE cash_register_id = $1 \
             ORDER BY opened_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list register sessions"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn list_transactions(
        &self,
        session_id: RegisterSessionId,
    ) -> AppResult<Vec<RegisterTransaction>> {
        sqlx::query_as::<_, RegisterTransaction>(
            "SELECT * FROM register_transactions WHERE session_id = $1 ORDER BY occurred_at, id",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list register transactions"))
    }

    /// Book a manual movement on an open session.
    pub async fn add_transaction(
        &self,
        session_id: RegisterSessionId,
        input: &TransactionInput,
    ) -> AppResult<RegisterTransaction> {
        let mut tx = self.begin().await?;

        let session = sqlx::query_as::<_, RegisterSession>(
            "SELECT * FROM register_sessions WHERE id = $1 FOR UPDATE",
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to lock register session"))?
        .ok_or_else(|| AppError::not_found(format!("Register session {session_id} not found")))?;
        if !session.is_open() {
            return Err(AppError::conflict(format!(
                "Register session {session_id} is closed"
            )));
        }

        let movement = insert_transaction(
            &mut tx,
            session_id,
            input.kind,
            input.amount,
            input.description.as_deref(),
            None,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit register transaction"))?;
        Ok(movement)
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_read_error(e, "Failed to begin transaction"))
    }
}

async fn lock_register(
    tx: &mut Transaction<'static, Postgres>,
    id: CashRegisterId,
) -> AppResult<CashRegister> {
    sqlx::query_as::<_, CashRegister>("SELECT * FROM cash_registers WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to lock cash register"))?
        .ok_or_else(|| AppError::not_found(format!("Cash register {id} not found")))
}

async fn set_status(
    tx: &mut Transaction<'static, Postgres>,
    id: CashRegisterId,
    status: RegisterStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE cash_registers SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update cash register status"))?;
    Ok(())
}

/// Lock the open session of a register, if it has one.
pub(crate) async fn lock_open_session(
    tx: &mut Transaction<'static, Postgres>,
    register_id: CashRegisterId,
) -> AppResult<Option<RegisterSession>> {
    sqlx::query_as::<_, RegisterSession>(
        "SELECT * FROM register_sessions \
         WHERE cash_register_id = $1 AND closed_at IS NULL FOR UPDATE",
    )
    .bind(register_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| map_read_error(e, "Failed to lock open session"))
}

/// Lock the open session that was opened first across all registers.
pub(crate) async fn lock_earliest_open_session(
    tx: &mut Transaction<'static, Postgres>,
) -> AppResult<Option<RegisterSession>> {
    sqlx::query_as::<_, RegisterSession>(
        "SELECT * FROM register_sessions WHERE closed_at IS NULL \
         ORDER BY opened_at, id LIMIT 1 FOR UPDATE",
    )
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| map_read_error(e, "Failed to lock open session"))
}

pub(crate) async fn insert_transaction(
    tx: &mut Transaction<'static, Postgres>,
    session_id: RegisterSessionId,
    kind: TransactionKind,
    amount: Guaranies,
    description: Option<&str>,
    invoice_id: Option<InvoiceId>,
) -> AppResult<RegisterTransaction> {
    sqlx::query_as::<_, RegisterTransaction>(
        "INSERT INTO register_transactions (session_id, kind, amount, description, invoice_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(session_id)
    .bind(kind)
    .bind(amount)
    .bind(description)
    .bind(invoice_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to record register transaction"))
}
