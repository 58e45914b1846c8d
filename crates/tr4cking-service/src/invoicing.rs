//! Invoicing: document types, fiscal stamps and invoices.
//!
//! An invoice is only issued while a cash register is open; its total is
//! booked as income on that register's session in the same transaction.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{DocumentTypeId, FiscalStampId, InvoiceId, PageRequest, PageResponse};
use tr4cking_database::repositories::{
    CashRegisterRepository, DocumentTypeRepository, EmployeeRepository, FiscalStampRepository,
    InvoiceDraft, InvoiceFilter, InvoiceRepository,
};
use tr4cking_entity::invoice::{
    DocumentType, DocumentTypeInput, FiscalStamp, FiscalStampInput, Invoice, InvoiceDetail,
    InvoiceHistory, InvoiceInput, InvoiceTotals, PaymentCondition,
};

use crate::context::RequestContext;
use crate::register::acting_employee;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct InvoicingService {
    invoices: Arc<InvoiceRepository>,
    document_types: Arc<DocumentTypeRepository>,
    stamps: Arc<FiscalStampRepository>,
    registers: Arc<CashRegisterRepository>,
    employees: Arc<EmployeeRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl InvoicingService {
    pub fn new(
        invoices: Arc<InvoiceRepository>,
        document_types: Arc<DocumentTypeRepository>,
        stamps: Arc<FiscalStampRepository>,
        registers: Arc<CashRegisterRepository>,
        employees: Arc<EmployeeRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            invoices,
            document_types,
            stamps,
            registers,
            employees,
            rbac,
        }
    }

    fn can_read(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)
    }

    fn can_write_catalog(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)
    }

    // ── Document types ───────────────────────────────────────

    pub async fn list_document_types(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DocumentType>> {
        self.can_read(ctx)?;
        self.document_types.list(page).await
    }

    pub async fn get_document_type(
        &self,
        ctx: &RequestContext,
        id: DocumentTypeId,
    ) -> AppResult<DocumentType> {
        self.can_read(ctx)?;
        found(self.document_types.find_by_id(id).await?, "Document type", id)
    }

    pub async fn create_document_type(
        &self,
        ctx: &RequestContext,
        input: &DocumentTypeInput,
    ) -> AppResult<DocumentType> {
        self.can_write_catalog(ctx)?;
        self.document_types.create(input).await
    }

    pub async fn update_document_type(
        &self,
        ctx: &RequestContext,
        id: DocumentTypeId,
        input: &DocumentTypeInput,
    ) -> AppResult<DocumentType> {
        self.can_write_catalog(ctx)?;
        self.document_types.update(id, input).await
    }

    pub async fn delete_document_type(
        &self,
        ctx: &RequestContext,
        id: DocumentTypeId,
    ) -> AppResult<()> {
        self.can_write_catalog(ctx)?;
        deleted(self.document_types.delete(id).await?, "Document type", id)
    }

    // ── Fiscal stamps ────────────────────────────────────────

    pub async fn list_stamps(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FiscalStamp>> {
        self.can_read(ctx)?;
        self.stamps.list(page).await
    }

    pub async fn get_stamp(
        &self,
        ctx: &RequestContext,
        id: FiscalStampId,
    ) -> AppResult<FiscalStamp> {
        self.can_read(ctx)?;
        found(self.stamps.find_by_id(id).await?, "Fiscal stamp", id)
    }

    pub async fn create_stamp(
        &self,
        ctx: &RequestContext,
        input: &FiscalStampInput,
    ) -> AppResult<FiscalStamp> {
        self.can_write_catalog(ctx)?;
        let stamp = self.stamps.create(input).await?;
        info!(stamp_id = %stamp.id, number = %stamp.number, "Fiscal stamp registered");
        Ok(stamp)
    }

    pub async fn update_stamp(
        &self,
        ctx: &RequestContext,
        id: FiscalStampId,
        input: &FiscalStampInput,
    ) -> AppResult<FiscalStamp> {
        self.can_write_catalog(ctx)?;
        self.stamps.update(id, input).await
    }

    pub async fn delete_stamp(&self, ctx: &RequestContext, id: FiscalStampId) -> AppResult<()> {
        self.can_write_catalog(ctx)?;
        deleted(self.stamps.delete(id).await?, "Fiscal stamp", id)
    }

    // ── Invoices ─────────────────────────────────────────────

    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &InvoiceFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Invoice>> {
        self.can_read(ctx)?;
        self.invoices.list(filter, page).await
    }

    /// An invoice with its lines.
    pub async fn get(&self, ctx: &RequestContext, id: InvoiceId) -> AppResult<InvoiceDetail> {
        self.can_read(ctx)?;
        let invoice = found(self.invoices.find_by_id(id).await?, "Invoice", id)?;
        let lines = self.invoices.lines_of(id).await?;
        Ok(InvoiceDetail { invoice, lines })
    }

    pub async fn history(
        &self,
        ctx: &RequestContext,
        id: InvoiceId,
    ) -> AppResult<Vec<InvoiceHistory>> {
        self.can_read(ctx)?;
        found(self.invoices.find_by_id(id).await?, "Invoice", id)?;
        self.invoices.history_of(id).await
    }

    /// Issue an invoice and book its total on an open register.
    pub async fn issue(
        &self,
        ctx: &RequestContext,
        input: &InvoiceInput,
    ) -> AppResult<InvoiceDetail> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::InvoiceIssue)?;
        let totals = InvoiceTotals::from_lines(&input.lines)?;

        if self.registers.list_open().await?.is_empty() {
            return Err(AppError::conflict(
                "Cannot issue an invoice without an open cash register",
            ));
        }

        let stamp = self.stamps.find_by_id(input.stamp_id).await?.ok_or_else(|| {
            AppError::validation(format!("Fiscal stamp {} does not exist", input.stamp_id))
        })?;
        check_stamp(&stamp, ctx.request_time.date_naive())?;

        let document_type = self
            .document_types
            .find_by_id(input.document_type_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Document type {} does not exist",
                    input.document_type_id
                ))
            })?;
        check_customer(&document_type, input)?;

        let employee_id = acting_employee(&self.employees, ctx, input.employee_id).await?;

        let draft = InvoiceDraft {
            number: input.number.clone(),
            customer_id: input.customer_id,
            employee_id,
            document_type_id: input.document_type_id,
            stamp_id: input.stamp_id,
            stop_id: input.stop_id,
            cash_register_id: input.cash_register_id,
            condition: input.condition,
            lines: input.lines.clone(),
            totals,
        };
        let detail = self.invoices.issue(&draft).await?;

        info!(
            invoice_id = %detail.invoice.id,
            number = %detail.invoice.number,
            register_id = %detail.invoice.cash_register_id,
            total = detail.invoice.total_amount,
            by = %ctx.username,
            "Invoice issued"
        );
        Ok(detail)
    }

    /// Void an issued invoice, booking the refund on its register.
    pub async fn void(&self, ctx: &RequestContext, id: InvoiceId) -> AppResult<Invoice> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::InvoiceVoid)?;
        let employee_id = self.employees.find_by_user(ctx.user_id).await?.map(|e| e.id);
        let invoice = self.invoices.void(id, employee_id).await?;
        info!(invoice_id = %id, number = %invoice.number, by = %ctx.username, "Invoice voided");
        Ok(invoice)
    }

    pub async fn change_condition(
        &self,
        ctx: &RequestContext,
        id: InvoiceId,
        condition: PaymentCondition,
    ) -> AppResult<Invoice> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::InvoiceIssue)?;
        let employee_id = self.employees.find_by_user(ctx.user_id).await?.map(|e| e.id);
        let invoice = self
            .invoices
            .change_condition(id, condition, employee_id)
            .await?;
        info!(invoice_id = %id, condition = %condition, "Invoice condition changed");
        Ok(invoice)
    }
}

fn check_stamp(stamp: &FiscalStamp, today: NaiveDate) -> AppResult<()> {
    if !stamp.is_usable_on(today) {
        return Err(AppError::validation(format!(
            "Fiscal stamp {} is not valid on {today} (active: {}, valid {} to {})",
            stamp.number, stamp.active, stamp.valid_from, stamp.valid_until
        )));
    }
    Ok(())
}

fn check_customer(document_type: &DocumentType, input: &InvoiceInput) -> AppResult<()> {
    if document_type.requires_registered_customer && input.customer_id.is_none() {
        return Err(AppError::validation(format!(
            "Document type '{}' requires a registered customer",
            document_type.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tr4cking_core::types::{CustomerId, DocumentTypeId, FiscalStampId};

    use super::*;

    fn stamp(active: bool) -> FiscalStamp {
        FiscalStamp {
            id: FiscalStampId::new(1),
            number: "12345678".into(),
            valid_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            active,
        }
    }

    #[test]
    fn test_stamp_window() {
        let inside = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(check_stamp(&stamp(true), inside).is_ok());
        assert!(check_stamp(&stamp(true), after).is_err());
        assert!(check_stamp(&stamp(false), inside).is_err());
    }

    #[test]
    fn test_registered_customer_requirement() {
        let factura = DocumentType {
            id: DocumentTypeId::new(1),
            code: "FAC".into(),
            name: "Factura contado".into(),
            description: None,
            requires_registered_customer: true,
        };
        let mut input: InvoiceInput = serde_json::from_str(
            r#"{
                "document_type_id": 1,
                "stamp_id": 1,
                "lines": [{"description": "Pasaje", "quantity": 1, "unit_price": 90000}]
            }"#,
        )
        .unwrap();
        assert!(check_customer(&factura, &input).is_err());

        input.customer_id = Some(CustomerId::new(5));
        assert!(check_customer(&factura, &input).is_ok());
    }
}
