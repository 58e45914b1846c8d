//! Persons, customers, passengers and employees.
//!
//! Counter staff register persons, customers and passengers while selling,
//! so those writes need `TicketSell`. Employees are catalog data.

use std::sync::Arc;

use tracing::info;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{
    CustomerId, EmployeeId, PageRequest, PageResponse, PassengerId, PersonId,
};
use tr4cking_database::repositories::{
    CustomerRepository, EmployeeFilter, EmployeeRepository, PassengerRepository, PersonRepository,
    SearchFilter,
};
use tr4cking_entity::people::{
    Customer, CustomerInput, Employee, EmployeeInput, PassengerInput, PassengerView, Person,
    PersonInput,
};

use crate::context::RequestContext;
use crate::{deleted, found};

#[derive(Debug, Clone)]
pub struct PeopleService {
    persons: Arc<PersonRepository>,
    customers: Arc<CustomerRepository>,
    passengers: Arc<PassengerRepository>,
    employees: Arc<EmployeeRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl PeopleService {
    pub fn new(
        persons: Arc<PersonRepository>,
        customers: Arc<CustomerRepository>,
        passengers: Arc<PassengerRepository>,
        employees: Arc<EmployeeRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            persons,
            customers,
            passengers,
            employees,
            rbac,
        }
    }

    fn can_read(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogRead)
    }

    fn can_register(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::TicketSell)
    }

    // ── Persons ──────────────────────────────────────────────

    pub async fn list_persons(
        &self,
        ctx: &RequestContext,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Person>> {
        self.can_read(ctx)?;
        self.persons.list(filter, page).await
    }

    pub async fn get_person(&self, ctx: &RequestContext, id: PersonId) -> AppResult<Person> {
        self.can_read(ctx)?;
        found(self.persons.find_by_id(id).await?, "Person", id)
    }

    pub async fn create_person(
        &self,
        ctx: &RequestContext,
        input: &PersonInput,
    ) -> AppResult<Person> {
        self.can_register(ctx)?;
        let person = self.persons.create(input).await?;
        info!(person_id = %person.id, by = %ctx.username, "Person registered");
        Ok(person)
    }

    pub async fn update_person(
        &self,
        ctx: &RequestContext,
        id: PersonId,
        input: &PersonInput,
    ) -> AppResult<Person> {
        self.can_register(ctx)?;
        self.persons.update(id, input).await
    }

    pub async fn delete_person(&self, ctx: &RequestContext, id: PersonId) -> AppResult<()> {
        self.can_register(ctx)?;
        deleted(self.persons.delete(id).await?, "Person", id)
    }

    // ── Customers ────────────────────────────────────────────

    pub async fn list_customers(
        &self,
        ctx: &RequestContext,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Customer>> {
        self.can_read(ctx)?;
        self.customers.list(filter, page).await
    }

    pub async fn get_customer(&self, ctx: &RequestContext, id: CustomerId) -> AppResult<Customer> {
        self.can_read(ctx)?;
        found(self.customers.find_by_id(id).await?, "Customer", id)
    }

    pub async fn create_customer(
        &self,
        ctx: &RequestContext,
        input: &CustomerInput,
    ) -> AppResult<Customer> {
        self.can_register(ctx)?;
        let customer = self.customers.create(input).await?;
        info!(customer_id = %customer.id, ruc = %customer.ruc, "Customer registered");
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        ctx: &RequestContext,
        id: CustomerId,
        input: &CustomerInput,
    ) -> AppResult<Customer> {
        self.can_register(ctx)?;
        self.customers.update(id, input).await
    }

    pub async fn delete_customer(&self, ctx: &RequestContext, id: CustomerId) -> AppResult<()> {
        self.can_register(ctx)?;
        deleted(self.customers.delete(id).await?, "Customer", id)
    }

    // ── Passengers ───────────────────────────────────────────

    pub async fn list_passengers(
        &self,
        ctx: &RequestContext,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PassengerView>> {
        self.can_read(ctx)?;
        self.passengers.list(filter, page).await
    }

    pub async fn get_passenger(
        &self,
        ctx: &RequestContext,
        id: PassengerId,
    ) -> AppResult<PassengerView> {
        self.can_read(ctx)?;
        found(self.passengers.find_by_id(id).await?, "Passenger", id)
    }

    pub async fn create_passenger(
        &self,
        ctx: &RequestContext,
        input: &PassengerInput,
    ) -> AppResult<PassengerView> {
        self.can_register(ctx)?;
        self.passengers.create(input).await
    }

    pub async fn update_passenger(
        &self,
        ctx: &RequestContext,
        id: PassengerId,
        input: &PassengerInput,
    ) -> AppResult<PassengerView> {
        self.can_register(ctx)?;
        self.passengers.update(id, input).await
    }

    pub async fn delete_passenger(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<()> {
        self.can_register(ctx)?;
        deleted(self.passengers.delete(id).await?, "Passenger", id)
    }

    // ── Employees ────────────────────────────────────────────

    pub async fn list_employees(
        &self,
        ctx: &RequestContext,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Employee>> {
        self.can_read(ctx)?;
        self.employees.list(filter, page).await
    }

    pub async fn get_employee(&self, ctx: &RequestContext, id: EmployeeId) -> AppResult<Employee> {
        self.can_read(ctx)?;
        found(self.employees.find_by_id(id).await?, "Employee", id)
    }

    pub async fn create_employee(
        &self,
        ctx: &RequestContext,
        input: &EmployeeInput,
    ) -> AppResult<Employee> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)?;
        let employee = self.employees.create(input).await?;
        info!(employee_id = %employee.id, company_id = %employee.company_id, "Employee hired");
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        ctx: &RequestContext,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> AppResult<Employee> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)?;
        self.employees.update(id, input).await
    }

    pub async fn delete_employee(&self, ctx: &RequestContext, id: EmployeeId) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::CatalogWrite)?;
        deleted(self.employees.delete(id).await?, "Employee", id)
    }
}
