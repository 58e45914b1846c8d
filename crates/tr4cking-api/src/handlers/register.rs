//! Cash register handlers: catalog, open/close cycle and movements.

use axum::extract::{Path, State};

use tr4cking_core::types::{CashRegisterId, PageResponse, RegisterSessionId};
use tr4cking_entity::register::{
    CashRegister, CashRegisterInput, CloseRegister, OpenRegister, OpenSession, RegisterSession,
    RegisterTransaction, SessionClosing, TransactionInput,
};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::state::AppState;

/// GET /api/cash-registers
pub async fn list_cash_registers(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<PageResponse<CashRegister>> {
    dto::ok(state.register_service.list(&auth, &page).await?)
}

/// GET /api/cash-registers/{id}
pub async fn get_cash_register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CashRegisterId>,
) -> ApiResult<CashRegister> {
    dto::ok(state.register_service.get(&auth, id).await?)
}

/// POST /api/cash-registers
pub async fn create_cash_register(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CashRegisterInput>,
) -> Created<CashRegister> {
    dto::created(state.register_service.create(&auth, &input).await?)
}

/// PUT /api/cash-registers/{id}
pub async fn update_cash_register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CashRegisterId>,
    ValidatedJson(input): ValidatedJson<CashRegisterInput>,
) -> ApiResult<CashRegister> {
    dto::ok(state.register_service.update(&auth, id, &input).await?)
}

/// DELETE /api/cash-registers/{id}
pub async fn delete_cash_register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CashRegisterId>,
) -> NoContent {
    state.register_service.delete(&auth, id).await?;
    dto::no_content()
}

/// GET /api/cash-registers/current
pub async fn current_registers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<OpenRegister>> {
    dto::ok(state.register_service.current(&auth).await?)
}

/// POST /api/cash-registers/{id}/open
pub async fn open_register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CashRegisterId>,
    ValidatedJson(body): ValidatedJson<OpenSession>,
) -> Created<RegisterSession> {
    dto::created(state.register_service.open(&auth, id, &body).await?)
}

/// POST /api/cash-registers/{id}/close
pub async fn close_register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CashRegisterId>,
    ValidatedJson(body): ValidatedJson<CloseRegister>,
) -> ApiResult<SessionClosing> {
    dto::ok(state.register_service.close(&auth, id, &body).await?)
}

/// GET /api/cash-registers/{id}/sessions
pub async fn register_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CashRegisterId>,
    Pagination(page): Pagination,
) -> ApiResult<PageResponse<RegisterSession>> {
    dto::ok(state.register_service.sessions(&auth, id, &page).await?)
}

/// GET /api/register-sessions/{id}/transactions
pub async fn session_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RegisterSessionId>,
) -> ApiResult<Vec<RegisterTransaction>> {
    dto::ok(state.register_service.transactions(&auth, id).await?)
}

/// POST /api/register-sessions/{id}/transactions
pub async fn add_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RegisterSessionId>,
    ValidatedJson(input): ValidatedJson<TransactionInput>,
) -> Created<RegisterTransaction> {
    dto::created(state.register_service.add_transaction(&auth, id, &input).await?)
}
