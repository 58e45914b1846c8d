//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use tr4cking_auth::jwt::{JwtDecoder, JwtEncoder};
use tr4cking_auth::password::{PasswordHasher, PasswordValidator};
use tr4cking_auth::rbac::RbacEnforcer;
use tr4cking_core::config::AppConfig;
use tr4cking_core::result::AppResult;
use tr4cking_database::repositories::{
    BusRepository, CashRegisterRepository, CompanyRepository, CustomerRepository,
    DashboardRepository, DocumentTypeRepository, EmployeeRepository, FiscalStampRepository,
    InvoiceRepository, LocalityRepository, ParcelRepository, PassengerRepository,
    PersonRepository, ReservationRepository, RouteRepository, RouteStopRepository,
    ScheduleRepository, SeatRepository, StopRepository, TicketRepository, TripRepository,
    UserRepository,
};
use tr4cking_entity::fleet::SeatKind;
use tr4cking_service::{
    AuthService, DashboardService, FleetService, GeographyService, InvoicingService,
    ParcelService, PeopleService, RegisterService, RouteService, TicketingService, TripService,
    UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub people_service: Arc<PeopleService>,
    pub geography_service: Arc<GeographyService>,
    pub fleet_service: Arc<FleetService>,
    pub route_service: Arc<RouteService>,
    pub trip_service: Arc<TripService>,
    pub ticketing_service: Arc<TicketingService>,
    pub parcel_service: Arc<ParcelService>,
    pub invoicing_service: Arc<InvoicingService>,
    pub register_service: Arc<RegisterService>,
    pub dashboard_service: Arc<DashboardService>,
}

impl AppState {
    /// Wire repositories, auth components and services over one pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> AppResult<Self> {
        let default_seat_kind: SeatKind = config.sales.default_seat_kind.parse()?;

        // ── Repositories ─────────────────────────────────────
        let pool = || db_pool.clone();
        let user_repo = Arc::new(UserRepository::new(pool()));
        let person_repo = Arc::new(PersonRepository::new(pool()));
        let customer_repo = Arc::new(CustomerRepository::new(pool()));
        let passenger_repo = Arc::new(PassengerRepository::new(pool()));
        let employee_repo = Arc::new(EmployeeRepository::new(pool()));
        let company_repo = Arc::new(CompanyRepository::new(pool()));
        let locality_repo = Arc::new(LocalityRepository::new(pool()));
        let stop_repo = Arc::new(StopRepository::new(pool()));
        let bus_repo = Arc::new(BusRepository::new(pool()));
        let seat_repo = Arc::new(SeatRepository::new(pool()));
        let route_repo = Arc::new(RouteRepository::new(pool()));
        let route_stop_repo = Arc::new(RouteStopRepository::new(pool()));
        let schedule_repo = Arc::new(ScheduleRepository::new(pool()));
        let trip_repo = Arc::new(TripRepository::new(pool()));
        let reservation_repo = Arc::new(ReservationRepository::new(pool()));
        let ticket_repo = Arc::new(TicketRepository::new(pool()));
        let parcel_repo = Arc::new(ParcelRepository::new(pool()));
        let document_type_repo = Arc::new(DocumentTypeRepository::new(pool()));
        let stamp_repo = Arc::new(FiscalStampRepository::new(pool()));
        let invoice_repo = Arc::new(InvoiceRepository::new(pool()));
        let register_repo = Arc::new(CashRegisterRepository::new(pool()));
        let dashboard_repo = Arc::new(DashboardRepository::new(pool()));

        // ── Auth ─────────────────────────────────────────────
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let rbac = Arc::new(RbacEnforcer::new());

        // ── Services ─────────────────────────────────────────
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            jwt_encoder,
            config.auth.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            user_repo,
            password_hasher,
            password_validator,
            Arc::clone(&rbac),
        ));
        let people_service = Arc::new(PeopleService::new(
            person_repo,
            customer_repo,
            passenger_repo,
            Arc::clone(&employee_repo),
            Arc::clone(&rbac),
        ));
        let geography_service = Arc::new(GeographyService::new(
            locality_repo,
            stop_repo,
            Arc::clone(&rbac),
        ));
        let fleet_service = Arc::new(FleetService::new(
            company_repo,
            Arc::clone(&bus_repo),
            Arc::clone(&seat_repo),
            Arc::clone(&rbac),
            default_seat_kind,
        ));
        let route_service = Arc::new(RouteService::new(
            route_repo,
            route_stop_repo,
            Arc::clone(&schedule_repo),
            Arc::clone(&rbac),
        ));
        let trip_service = Arc::new(TripService::new(
            trip_repo,
            schedule_repo,
            bus_repo,
            seat_repo,
            Arc::clone(&rbac),
        ));
        let ticketing_service = Arc::new(TicketingService::new(
            reservation_repo,
            ticket_repo,
            Arc::clone(&rbac),
        ));
        let parcel_service = Arc::new(ParcelService::new(parcel_repo, Arc::clone(&rbac)));
        let invoicing_service = Arc::new(InvoicingService::new(
            invoice_repo,
            document_type_repo,
            stamp_repo,
            Arc::clone(&register_repo),
            Arc::clone(&employee_repo),
            Arc::clone(&rbac),
        ));
        let register_service = Arc::new(RegisterService::new(
            register_repo,
            employee_repo,
            Arc::clone(&rbac),
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            dashboard_repo,
            rbac,
            config.sales.dashboard_window_days,
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_decoder,
            auth_service,
            user_service,
            people_service,
            geography_service,
            fleet_service,
            route_service,
            trip_service,
            ticketing_service,
            parcel_service,
            invoicing_service,
            register_service,
            dashboard_service,
        })
    }
}
