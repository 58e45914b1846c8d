//! Invoice repository.
//!
//! Issuing and voiding an invoice both touch the cash register, so they
//! run in a single transaction together with the register movement.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{
    CashRegisterId, CustomerId, DocumentTypeId, EmployeeId, FiscalStampId, InvoiceId,
    PageRequest, PageResponse, StopId,
};
use tr4cking_entity::invoice::{
    Invoice, InvoiceDetail, InvoiceHistory, InvoiceLine, InvoiceLineInput, InvoiceStatus,
    InvoiceTotals, PaymentCondition, next_invoice_number,
};
use tr4cking_entity::register::TransactionKind;

use super::cash_register::{insert_transaction, lock_earliest_open_session, lock_open_session};
use crate::error::{map_read_error, map_write_error};

/// Optional filters for listing invoices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<CustomerId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// A validated invoice ready to be written.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub number: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub employee_id: EmployeeId,
    pub document_type_id: DocumentTypeId,
    pub stamp_id: FiscalStampId,
    pub stop_id: Option<StopId>,
    /// Register to book on. `None` picks the register opened first.
    pub cash_register_id: Option<CashRegisterId>,
    pub condition: PaymentCondition,
    pub lines: Vec<InvoiceLineInput>,
    pub totals: InvoiceTotals,
}

const WHERE: &str = "WHERE ($1::invoice_status IS NULL OR status = $1) \
                       AND ($2::BIGINT IS NULL OR customer_id = $2) \
                       AND ($3::TIMESTAMPTZ IS NULL OR issued_at >= $3) \
                       AND ($4::TIMESTAMPTZ IS NULL OR issued_at < $4)";

/// Advisory lock key serializing automatic invoice numbering.
const NUMBERING_LOCK: i64 = 0x7472_345F_696E_76;

/// Repository for invoices, their lines and their change history.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: InvoiceId) -> AppResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find invoice"))
    }

    pub async fn lines_of(&self, id: InvoiceId) -> AppResult<Vec<InvoiceLine>> {
        sqlx::query_as::<_, InvoiceLine>(
            "SELECT * FROM invoice_lines WHERE invoice_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to load invoice lines"))
    }

    pub async fn history_of(&self, id: InvoiceId) -> AppResult<Vec<InvoiceHistory>> {
        sqlx::query_as::<_, InvoiceHistory>(
            "SELECT * FROM invoice_history WHERE invoice_id = $1 ORDER BY changed_at, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to load invoice history"))
    }

    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Invoice>> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM invoices {WHERE}"))
            .bind(filter.status)
            .bind(filter.customer_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count invoices"))?;

        let items = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT * FROM invoices {WHERE} ORDER BY issued_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(filter.status)
        .bind(filter.customer_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list invoices"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Issue an invoice against an open cash register.
    ///
    /// Fails with a conflict when no register session is open, or when the
    /// requested register is closed. A positive total is booked as income on
    /// the session.
    pub async fn issue(&self, draft: &InvoiceDraft) -> AppResult<InvoiceDetail> {
        let mut tx = self.begin().await?;

        let session = match draft.cash_register_id {
            Some(register_id) => lock_open_session(&mut tx, register_id).await?.ok_or_else(|| {
                AppError::conflict(format!(
                    "Cash register {register_id} is not open; cannot issue an invoice"
                ))
            })?,
            None => lock_earliest_open_session(&mut tx).await?.ok_or_else(|| {
                AppError::conflict("Cannot issue an invoice without an open cash register")
            })?,
        };

        let number = match &draft.number {
            Some(number) => number.clone(),
            None => {
                let last = last_number(&mut tx).await?;
                next_invoice_number(last.as_deref()).ok_or_else(|| {
                    AppError::conflict("Invoice numbering is exhausted for series 001-001")
                })?
            }
        };

        let invoice = sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (number, customer_id, employee_id, document_type_id, stamp_id, \
                                   stop_id, cash_register_id, condition, total_amount, \
                                   exempt_amount, vat5_amount, vat10_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(&number)
        .bind(draft.customer_id)
        .bind(draft.employee_id)
        .bind(draft.document_type_id)
        .bind(draft.stamp_id)
        .bind(draft.stop_id)
        .bind(session.cash_register_id)
        .bind(draft.condition)
        .bind(draft.totals.total_amount)
        .bind(draft.totals.exempt_amount)
        .bind(draft.totals.vat5_amount)
        .bind(draft.totals.vat10_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create invoice"))?;

        let mut lines = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let row = sqlx::query_as::<_, InvoiceLine>(
                "INSERT INTO invoice_lines (invoice_id, ticket_id, parcel_id, description, \
                                            quantity, unit_price, vat_rate, subtotal) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
            )
            .bind(invoice.id)
            .bind(line.ticket_id)
            .bind(line.parcel_id)
            .bind(&line.description)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.vat_rate)
            .bind(line.subtotal()?)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to create invoice line"))?;
            lines.push(row);
        }

        if invoice.total_amount > 0 {
            let description = format!("Invoice {}", invoice.number);
            insert_transaction(
                &mut tx,
                session.id,
                TransactionKind::Income,
                invoice.total_amount,
                Some(&description),
                Some(invoice.id),
            )
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit invoice"))?;
        Ok(InvoiceDetail { invoice, lines })
    }

    /// Void an issued invoice, refunding its total from the register it
    /// was booked on. That register must still be open.
    pub async fn void(&self, id: InvoiceId, employee_id: Option<EmployeeId>) -> AppResult<Invoice> {
        let mut tx = self.begin().await?;

        let invoice = lock_invoice(&mut tx, id).await?;
        if invoice.status == InvoiceStatus::Voided {
            return Err(AppError::conflict(format!(
                "Invoice {} is already voided",
                invoice.number
            )));
        }
        let session = lock_open_session(&mut tx, invoice.cash_register_id)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "Cash register {} is closed; cannot void invoice {}",
                    invoice.cash_register_id, invoice.number
                ))
            })?;

        let voided = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET status = 'voided' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to void invoice"))?;

        record_change(
            &mut tx,
            id,
            "status",
            InvoiceStatus::Issued.as_str(),
            InvoiceStatus::Voided.as_str(),
            employee_id,
        )
        .await?;

        if voided.total_amount > 0 {
            let description = format!("Void of invoice {}", voided.number);
            insert_transaction(
                &mut tx,
                session.id,
                TransactionKind::Expense,
                voided.total_amount,
                Some(&description),
                Some(id),
            )
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit invoice void"))?;
        Ok(voided)
    }

    /// Switch the payment condition, keeping a history entry.
    pub async fn change_condition(
        &self,
        id: InvoiceId,
        condition: PaymentCondition,
        employee_id: Option<EmployeeId>,
    ) -> AppResult<Invoice> {
        let mut tx = self.begin().await?;

        let invoice = lock_invoice(&mut tx, id).await?;
        if invoice.status == InvoiceStatus::Voided {
            return Err(AppError::conflict(format!(
                "Invoice {} is voided and cannot be changed",
                invoice.number
            )));
        }
        if invoice.condition == condition {
            return Ok(invoice);
        }

        let updated = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET condition = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(condition)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update invoice condition"))?;

        record_change(
            &mut tx,
            id,
            "condition",
            invoice.condition.as_str(),
            condition.as_str(),
            employee_id,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit invoice change"))?;
        Ok(updated)
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_read_error(e, "Failed to begin transaction"))
    }
}

/// Highest invoice number issued so far.
///
/// Takes a transaction-scoped advisory lock first, so concurrent issues
/// number one after another instead of reading the same maximum.
async fn last_number(tx: &mut Transaction<'static, Postgres>) -> AppResult<Option<String>> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(NUMBERING_LOCK)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to lock invoice numbering"))?;
    sqlx::query_scalar("SELECT number FROM invoices ORDER BY number DESC LIMIT 1")
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to read last invoice number"))
}

async fn lock_invoice(
    tx: &mut Transaction<'static, Postgres>,
    id: InvoiceId,
) -> AppResult<Invoice> {
    sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_read_error(e, "Failed to lock invoice"))?
        .ok_or_else(|| AppError::not_found(format!("Invoice {id} not found")))
}

async fn record_change(
    tx: &mut Transaction<'static, Postgres>,
    id: InvoiceId,
    field: &str,
    old_value: &str,
    new_value: &str,
    employee_id: Option<EmployeeId>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO invoice_history (invoice_id, field, old_value, new_value, employee_id) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(field)
    .bind(old_value)
    .bind(new_value)
    .bind(employee_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to record invoice history"))?;
    Ok(())
}
