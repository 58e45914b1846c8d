//! Cash registers: opening, closing and manual cash movements.

use std::sync::Arc;

use tracing::{info, warn};

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{
    CashRegisterId, EmployeeId, PageRequest, PageResponse, RegisterSessionId,
};
use tr4cking_database::repositories::{CashRegisterRepository, EmployeeRepository};
use tr4cking_entity::register::{
    CashRegister, CashRegisterInput, CloseRegister, OpenRegister, OpenSession, RegisterSession,
    RegisterTransaction, SessionClosing, TransactionInput,
};

use crate::context::RequestContext;
use crate::found;

#[derive(Debug, Clone)]
pub struct RegisterService {
    registers: Arc<CashRegisterRepository>,
    employees: Arc<EmployeeRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl RegisterService {
    pub fn new(
        registers: Arc<CashRegisterRepository>,
        employees: Arc<EmployeeRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            registers,
            employees,
            rbac,
        }
    }

    fn can_read(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)
    }

    fn can_operate(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::RegisterOperate)
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CashRegister>> {
        self.can_read(ctx)?;
        self.registers.list(page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: CashRegisterId) -> AppResult<CashRegister> {
        self.can_read(ctx)?;
        found(self.registers.find_by_id(id).await?, "Cash register", id)
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: &CashRegisterInput,
    ) -> AppResult<CashRegister> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)?;
        let register = self.registers.create(input).await?;
        info!(register_id = %register.id, name = %register.name, "Cash register created");
        Ok(register)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: CashRegisterId,
        input: &CashRegisterInput,
    ) -> AppResult<CashRegister> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)?;
        self.registers.rename(id, input).await
    }

    /// Delete a register. Open registers must be closed first.
    pub async fn delete(&self, ctx: &RequestContext, id: CashRegisterId) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)?;
        crate::deleted(self.registers.delete(id).await?, "Cash register", id)
    }

    /// Open registers with their running session.
    pub async fn current(&self, ctx: &RequestContext) -> AppResult<Vec<OpenRegister>> {
        self.can_read(ctx)?;
        self.registers.list_open().await
    }

    pub async fn open(
        &self,
        ctx: &RequestContext,
        id: CashRegisterId,
        req: &OpenSession,
    ) -> AppResult<RegisterSession> {
        self.can_operate(ctx)?;
        let employee_id = acting_employee(&self.employees, ctx, req.employee_id).await?;
        let session = self
            .registers
            .open(id, employee_id, req.opening_amount)
            .await?;
        info!(
            register_id = %id,
            session_id = %session.id,
            employee_id = %employee_id,
            opening_amount = session.opening_amount,
            "Cash register opened"
        );
        Ok(session)
    }

    pub async fn close(
        &self,
        ctx: &RequestContext,
        id: CashRegisterId,
        req: &CloseRegister,
    ) -> AppResult<SessionClosing> {
        self.can_operate(ctx)?;
        let employee_id = acting_employee(&self.employees, ctx, req.employee_id).await?;
        let closing = self
            .registers
            .close(id, employee_id, req.closing_amount)
            .await?;

        if closing.difference != 0 {
            warn!(
                register_id = %id,
                session_id = %closing.session.id,
                expected = closing.expected_amount,
                counted = closing.closing_amount,
                difference = closing.difference,
                "Cash register closed with a difference"
            );
        } else {
            info!(register_id = %id, session_id = %closing.session.id, "Cash register closed");
        }
        Ok(closing)
    }

    pub async fn sessions(
        &self,
        ctx: &RequestContext,
        id: CashRegisterId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RegisterSession>> {
        self.can_read(ctx)?;
        found(self.registers.find_by_id(id).await?, "Cash register", id)?;
        self.registers.list_sessions(id, page).await
    }

    pub async fn transactions(
        &self,
        ctx: &RequestContext,
        session_id: RegisterSessionId,
    ) -> AppResult<Vec<RegisterTransaction>> {
        self.can_read(ctx)?;
        found(
            self.registers.find_session(session_id).await?,
            "Register session",
            session_id,
        )?;
        self.registers.list_transactions(session_id).await
    }

    /// Book a manual income or expense on an open session.
    pub async fn add_transaction(
        &self,
        ctx: &RequestContext,
        session_id: RegisterSessionId,
        input: &TransactionInput,
    ) -> AppResult<RegisterTransaction> {
        self.can_operate(ctx)?;
        let movement = self.registers.add_transaction(session_id, input).await?;
        info!(
            session_id = %session_id,
            kind = %movement.kind,
            amount = movement.amount,
            by = %ctx.username,
            "Register movement booked"
        );
        Ok(movement)
    }
}

/// The employee acting on a register or invoice: the one named in the
/// request, else the employee record linked to the caller's account.
pub(crate) async fn acting_employee(
    employees: &EmployeeRepository,
    ctx: &RequestContext,
    explicit: Option<EmployeeId>,
) -> AppResult<EmployeeId> {
    if let Some(id) = explicit {
        return found(employees.find_by_id(id).await?, "Employee", id).map(|e| e.id);
    }
    employees
        .find_by_user(ctx.user_id)
        .await?
        .map(|e| e.id)
        .ok_or_else(|| {
            AppError::validation(format!(
                "User '{}' is not linked to an employee; pass employee_id",
                ctx.username
            ))
        })
}
