//! Person, customer, passenger and employee handlers.

use axum::extract::{Path, State};

use tr4cking_core::types::{CustomerId, EmployeeId, PageResponse, PassengerId, PersonId};
use tr4cking_database::repositories::{EmployeeFilter, SearchFilter};
use tr4cking_entity::people::{
    Customer, CustomerInput, Employee, EmployeeInput, PassengerInput, PassengerView, Person,
    PersonInput,
};

use crate::dto::{self, ApiResult, Created, NoContent};
use crate::extractors::{AuthUser, Pagination, QueryFilter, ValidatedJson};
use crate::state::AppState;

/// GET /api/persons
pub async fn list_persons(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<SearchFilter>,
) -> ApiResult<PageResponse<Person>> {
    dto::ok(state.people_service.list_persons(&auth, &filter, &page).await?)
}

/// GET /api/persons/{id}
pub async fn get_person(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PersonId>,
) -> ApiResult<Person> {
    dto::ok(state.people_service.get_person(&auth, id).await?)
}

/// POST /api/persons
pub async fn create_person(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<PersonInput>,
) -> Created<Person> {
    dto::created(state.people_service.create_person(&auth, &input).await?)
}

/// PUT /api/persons/{id}
pub async fn update_person(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PersonId>,
    ValidatedJson(input): ValidatedJson<PersonInput>,
) -> ApiResult<Person> {
    dto::ok(state.people_service.update_person(&auth, id, &input).await?)
}

/// DELETE /api/persons/{id}
pub async fn delete_person(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PersonId>,
) -> NoContent {
    state.people_service.delete_person(&auth, id).await?;
    dto::no_content()
}

/// GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<SearchFilter>,
) -> ApiResult<PageResponse<Customer>> {
    dto::ok(state.people_service.list_customers(&auth, &filter, &page).await?)
}

/// GET /api/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CustomerId>,
) -> ApiResult<Customer> {
    dto::ok(state.people_service.get_customer(&auth, id).await?)
}

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CustomerInput>,
) -> Created<Customer> {
    dto::created(state.people_service.create_customer(&auth, &input).await?)
}

/// PUT /api/customers/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CustomerId>,
    ValidatedJson(input): ValidatedJson<CustomerInput>,
) -> ApiResult<Customer> {
    dto::ok(state.people_service.update_customer(&auth, id, &input).await?)
}

/// DELETE /api/customers/{id}
pub async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CustomerId>,
) -> NoContent {
    state.people_service.delete_customer(&auth, id).await?;
    dto::no_content()
}

/// GET /api/passengers
pub async fn list_passengers(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<SearchFilter>,
) -> ApiResult<PageResponse<PassengerView>> {
    dto::ok(state.people_service.list_passengers(&auth, &filter, &page).await?)
}

/// GET /api/passengers/{id}
pub async fn get_passenger(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PassengerId>,
) -> ApiResult<PassengerView> {
    dto::ok(state.people_service.get_passenger(&auth, id).await?)
}

/// POST /api/passengers
pub async fn create_passenger(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<PassengerInput>,
) -> Created<PassengerView> {
    dto::created(state.people_service.create_passenger(&auth, &input).await?)
}

/// PUT /api/passengers/{id}
pub async fn update_passenger(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PassengerId>,
    ValidatedJson(input): ValidatedJson<PassengerInput>,
) -> ApiResult<PassengerView> {
    dto::ok(state.people_service.update_passenger(&auth, id, &input).await?)
}

/// DELETE /api/passengers/{id}
pub async fn delete_passenger(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PassengerId>,
) -> NoContent {
    state.people_service.delete_passenger(&auth, id).await?;
    dto::no_content()
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
    QueryFilter(filter): QueryFilter<EmployeeFilter>,
) -> ApiResult<PageResponse<Employee>> {
    dto::ok(state.people_service.list_employees(&auth, &filter, &page).await?)
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Employee> {
    dto::ok(state.people_service.get_employee(&auth, id).await?)
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<EmployeeInput>,
) -> Created<Employee> {
    dto::created(state.people_service.create_employee(&auth, &input).await?)
}

/// PUT /api/employees/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EmployeeId>,
    ValidatedJson(input): ValidatedJson<EmployeeInput>,
) -> ApiResult<Employee> {
    dto::ok(state.people_service.update_employee(&auth, id, &input).await?)
}

/// DELETE /api/employees/{id}
pub async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EmployeeId>,
) -> NoContent {
    state.people_service.delete_employee(&auth, id).await?;
    dto::no_content()
}
