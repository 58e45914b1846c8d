//! Document type, fiscal stamp and invoice handlers.
//!
//! Invoices have no update or delete endpoint: they are voided instead.

use axum::extract::{Path, State};

use tr4cking_core::types::{DocumentTypeId, FiscalStampId, InvoiceId, PageResponse};
use tr4cking_database::repositories::InvoiceFilter;
use tr4cking_entity::invoice::{
    ConditionChange, DocumentType, DocumentTypeInput, FiscalStamp, FiscalStampInput, Invoice,
    InvoiceDetail, InvoiceHistory, InvoiceInput,
};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/document-types
pub async fn list_document_types(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<PageResponse<DocumentType>> {
    dto::ok(state.invoicing_service.list_document_types(&auth, &page).await?)
}

/// GET /api/document-types/{id}
pub async fn get_document_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DocumentTypeId>,
) -> ApiResult<DocumentType> {
    dto::ok(state.invoicing_service.get_document_type(&auth, id).await?)
}

/// POST /api/document-types
pub async fn create_document_type(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<DocumentTypeInput>,
) -> Created<DocumentType> {
    dto::created(state.invoicing_service.create_document_type(&auth, &input).await?)
}

/// PUT /api/document-types/{id}
pub async fn update_document_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DocumentTypeId>,
    ValidatedJson(input): ValidatedJson<DocumentTypeInput>,
) -> ApiResult<DocumentType> {
    dto::ok(state.invoicing_service.update_document_type(&auth, id, &input).await?)
}

/// DELETE /api/document-types/{id}
pub async fn delete_document_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DocumentTypeId>,
) -> NoContent {
    state.invoicing_service.delete_document_type(&auth, id).await?;
    dto::no_content()
}

/// GET /api/fiscal-stamps
pub async fn list_fiscal_stamps(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<PageResponse<FiscalStamp>> {
    dto::ok(state.invoicing_service.list_stamps(&auth, &page).await?)
}

/// GET /api/fiscal-stamps/{id}
pub async fn get_fiscal_stamp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FiscalStampId>,
) -> ApiResult<FiscalStamp> {
    dto::ok(state.invoicing_service.get_stamp(&auth, id).await?)
}

/// POST /api/fiscal-stamps
pub async fn create_fiscal_stamp(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<FiscalStampInput>,
) -> Created<FiscalStamp> {
    dto::created(state.invoicing_service.create_stamp(&auth, &input).await?)
}

/// PUT /api/fiscal-stamps/{id}
pub async fn update_fiscal_stamp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FiscalStampId>,
    ValidatedJson(input): ValidatedJson<FiscalStampInput>,
) -> ApiResult<FiscalStamp> {
    dto::ok(state.invoicing_service.update_stamp(&auth, id, &input).await?)
}

/// DELETE /api/fiscal-stamps/{id}
pub async fn delete_fiscal_stamp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FiscalStampId>,
) -> NoContent {
    state.invoicing_service.delete_stamp(&auth, id).await?;
    dto::no_content()
}

/// GET /api/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<InvoiceFilter>,
) -> ApiResult<PageResponse<Invoice>> {
    dto::ok(state.invoicing_service.list(&auth, &filter, &page).await?)
}

/// GET /api/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvoiceId>,
) -> ApiResult<InvoiceDetail> {
    dto::ok(state.invoicing_service.get(&auth, id).await?)
}

/// POST /api/invoices
pub async fn issue_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<InvoiceInput>,
) -> Created<InvoiceDetail> {
    dto::created(state.invoicing_service.issue(&auth, &input).await?)
}

/// POST /api/invoices/{id}/void
pub async fn void_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvoiceId>,
) -> ApiResult<Invoice> {
    dto::ok(state.invoicing_service.void(&auth, id).await?)
}

/// PUT /api/invoices/{id}/condition
pub async fn change_condition(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvoiceId>,
    ValidatedJson(body): ValidatedJson<ConditionChange>,
) -> ApiResult<Invoice> {
    dto::ok(
        state
            .invoicing_service
            .change_condition(&auth, id, body.condition)
            .await?,
    )
}

/// GET /api/invoices/{id}/history
pub async fn invoice_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvoiceId>,
) -> ApiResult<Vec<InvoiceHistory>> {
    dto::ok(state.invoicing_service.history(&auth, id).await?)
}
