//! Load a small, realistic data set for development.
//!
//! Every record is looked up by its natural key first, so running the
//! command twice leaves the database unchanged.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use tr4cking_core::config::AppConfig;
use tr4cking_core::error::AppError;
use tr4cking_core::types::PageRequest;
use tr4cking_database::repositories::{
    BusRepository, CashRegisterRepository, CompanyRepository, CustomerRepository,
    DocumentTypeRepository, FiscalStampRepository, LocalityRepository, PersonRepository,
    RouteRepository, RouteStopRepository, StopRepository, TripFilter, TripRepository,
};
use tr4cking_entity::fleet::{Bus, BusInput, BusStatus, Company, CompanyInput, SeatKind};
use tr4cking_entity::geography::{Locality, LocalityInput, Stop, StopInput, StopKind};
use tr4cking_entity::invoice::{DocumentTypeInput, FiscalStampInput};
use tr4cking_entity::people::{CustomerInput, PersonInput};
use tr4cking_entity::register::CashRegisterInput;
use tr4cking_entity::route::{Route, RouteInput, RouteStopInput};
use tr4cking_entity::trip::TripInput;

use crate::output;

const COMPANIES: [(&str, &str); 2] = [
    ("NSA Transportes", "8000123-0"),
    ("Nuestra Señora de la Asunción", "8000456-0"),
];

const LOCALITIES: [(&str, f64, f64); 5] = [
    ("Asunción", -25.2637, -57.5759),
    ("Ciudad del Este", -25.5097, -54.6111),
    ("Encarnación", -27.3306, -55.8667),
    ("Coronel Oviedo", -25.4470, -56.4400),
    ("Villarrica", -25.7500, -56.4333),
];

const PERSONS: [(&str, &str, &str); 3] = [
    ("1234567", "Juan", "Pérez"),
    ("2345678", "María", "González"),
    ("3456789", "Carlos", "López"),
];

/// Route name, origin and destination locality indexes, hours, km, fare.
const ROUTES: [(&str, usize, usize, f64, f64, i64); 3] = [
    ("Asunción - Ciudad del Este", 0, 1, 5.0, 327.0, 90_000),
    ("Asunción - Encarnación", 0, 2, 6.0, 370.0, 110_000),
    ("Ciudad del Este - Encarnación", 1, 2, 4.5, 280.0, 80_000),
];

const DOCUMENT_TYPES: [(&str, &str, bool); 2] = [
    ("FC", "Factura contado", false),
    ("FCR", "Factura crédito", true),
];

const BUSES_PER_COMPANY: usize = 3;
const SEATS_PER_BUS: i32 = 40;
const TRIP_DAYS: i64 = 3;

pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let seeder = Seeder::new(pool, &config)?;

    let companies = seeder.companies().await?;
    let (localities, stops) = seeder.geography(&companies).await?;
    let buses = seeder.buses(&companies).await?;
    seeder.customers().await?;
    let routes = seeder.routes(&localities, &stops).await?;
    let trips = seeder.trips(&routes, &buses).await?;
    seeder.fiscal().await?;

    output::print_success("Sample data loaded.");
    output::print_kv("Companies", &companies.len().to_string());
    output::print_kv("Localities", &localities.len().to_string());
    output::print_kv("Buses", &buses.len().to_string());
    output::print_kv("Routes", &routes.len().to_string());
    output::print_kv("Trips created", &trips.to_string());
    Ok(())
}

struct Seeder {
    pool: PgPool,
    seat_kind: SeatKind,
}

impl Seeder {
    fn new(pool: PgPool, config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            pool,
            seat_kind: config.sales.default_seat_kind.parse()?,
        })
    }

    async fn companies(&self) -> Result<Vec<Company>, AppError> {
        let repo = CompanyRepository::new(self.pool.clone());
        let mut companies = Vec::with_capacity(COMPANIES.len());
        for (name, ruc) in COMPANIES {
            let company = match repo.find_by_name(name).await? {
                Some(existing) => existing,
                None => {
                    repo.create(&CompanyInput {
                        name: name.to_string(),
                        ruc: ruc.to_string(),
                        phone: None,
                        email: None,
                        legal_address: Some("Asunción, Paraguay".to_string()),
                    })
                    .await?
                }
            };
            companies.push(company);
        }
        Ok(companies)
    }

    /// One terminal and one central stop per locality. Returns the stops
    /// grouped by locality, terminal first.
    async fn geography(
        &self,
        companies: &[Company],
    ) -> Result<(Vec<Locality>, Vec<Vec<Stop>>), AppError> {
        let locality_repo = LocalityRepository::new(self.pool.clone());
        let stop_repo = StopRepository::new(self.pool.clone());
        let operator = companies.first().map(|c| c.id);

        let mut localities = Vec::with_capacity(LOCALITIES.len());
        let mut stops = Vec::with_capacity(LOCALITIES.len());
        for (name, latitude, longitude) in LOCALITIES {
            let locality = match locality_repo.find_by_name(name).await? {
                Some(existing) => existing,
                None => {
                    locality_repo
                        .create(&LocalityInput {
                            name: name.to_string(),
                            latitude: Some(latitude),
                            longitude: Some(longitude),
                        })
                        .await?
                }
            };

            let mut local_stops = Vec::with_capacity(2);
            for (kind, stop_name) in [
                (StopKind::Terminal, format!("Terminal de Ómnibus {name}")),
                (StopKind::BusStop, format!("Parada Centro {name}")),
            ] {
                let stop = match stop_repo.find_by_name(&stop_name).await? {
                    Some(existing) => existing,
                    None => {
                        stop_repo
                            .create(&StopInput {
                                company_id: operator,
                                locality_id: locality.id,
                                kind,
                                name: stop_name,
                                address: Some(format!("Centro, {name}")),
                                phone: None,
                                active: true,
                            })
                            .await?
                    }
                };
                local_stops.push(stop);
            }

            localities.push(locality);
            stops.push(local_stops);
        }
        Ok((localities, stops))
    }

    async fn buses(&self, companies: &[Company]) -> Result<Vec<Bus>, AppError> {
        let repo = BusRepository::new(self.pool.clone());
        let mut buses = Vec::new();
        for (i, company) in companies.iter().enumerate() {
            let prefix = if i == 0 { "ABC" } else { "XYZ" };
            for j in 1..=BUSES_PER_COMPANY {
                let plate = format!("{prefix}{j}23");
                let bus = match repo.find_by_plate(&plate).await? {
                    Some(existing) => existing,
                    None => {
                        repo.create_with_seats(
                            &BusInput {
                                plate,
                                brand: Some("Mercedes Benz".to_string()),
                                model: Some(format!("O50{j}")),
                                capacity: SEATS_PER_BUS,
                                status: BusStatus::Active,
                                company_id: company.id,
                            },
                            self.seat_kind,
                        )
                        .await?
                    }
                };
                buses.push(bus);
            }
        }
        Ok(buses)
    }

    async fn customers(&self) -> Result<(), AppError> {
        let person_repo = PersonRepository::new(self.pool.clone());
        let customer_repo = CustomerRepository::new(self.pool.clone());
        for (document, first_name, last_name) in PERSONS {
            let person = match person_repo.find_by_document(document).await? {
                Some(existing) => existing,
                None => {
                    person_repo
                        .create(&PersonInput {
                            document_number: document.to_string(),
                            first_name: first_name.to_string(),
                            last_name: last_name.to_string(),
                            phone: None,
                            address: None,
                        })
                        .await?
                }
            };
            if customer_repo.find_by_ruc(document).await?.is_none() {
                customer_repo
                    .create(&CustomerInput {
                        person_id: Some(person.id),
                        ruc: document.to_string(),
                        dv: document.chars().last().map(String::from),
                        business_name: format!("{first_name} {last_name}"),
                        phone: None,
                        address: None,
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Routes with the origin terminal at 08:00 and the destination
    /// terminal at 12:00.
    async fn routes(
        &self,
        localities: &[Locality],
        stops: &[Vec<Stop>],
    ) -> Result<Vec<Route>, AppError> {
        let route_repo = RouteRepository::new(self.pool.clone());
        let route_stop_repo = RouteStopRepository::new(self.pool.clone());
        let departure = |hour| NaiveTime::from_hms_opt(hour, 0, 0);

        let mut routes = Vec::with_capacity(ROUTES.len());
        for (name, origin, destination, hours, km, fare) in ROUTES {
            if origin >= localities.len() || destination >= localities.len() {
                continue;
            }
            let route = match route_repo.find_by_name(name).await? {
                Some(existing) => existing,
                None => {
                    route_repo
                        .create(&RouteInput {
                            name: name.to_string(),
                            total_duration_hours: hours,
                            distance_km: km,
                            base_price: fare,
                            active: true,
                        })
                        .await?
                }
            };

            if route_repo.stops_of(route.id).await?.is_empty() {
                let legs = [(origin, 1, departure(8)), (destination, 2, departure(12))];
                for (locality_index, position, departure_time) in legs {
                    let Some(stop) = stops.get(locality_index).and_then(|s| s.first()) else {
                        continue;
                    };
                    route_stop_repo
                        .create(&RouteStopInput {
                            route_id: route.id,
                            stop_id: stop.id,
                            position,
                            departure_time,
                        })
                        .await?;
                }
            }
            routes.push(route);
        }
        Ok(routes)
    }

    /// Trips for the first two routes over the next few days, two buses per
    /// route. A bus runs at most one unscheduled trip a day. Returns how many
    /// were created.
    async fn trips(&self, routes: &[Route], buses: &[Bus]) -> Result<usize, AppError> {
        let repo = TripRepository::new(self.pool.clone());
        let today = Utc::now().date_naive();
        let mut created = 0;

        for (r, route) in routes.iter().take(2).enumerate() {
            for bus in buses.iter().skip(r * 2).take(2) {
                for offset in 0..TRIP_DAYS {
                    let date = today + Duration::days(offset);
                    let existing = repo
                        .list(
                            &TripFilter {
                                route_id: None,
                                bus_id: Some(bus.id),
                                date: Some(date),
                                active: None,
                            },
                            &PageRequest::new(1, 1),
                        )
                        .await?;
                    if existing.total_items > 0 {
                        continue;
                    }
                    repo.create(&TripInput {
                        route_id: route.id,
                        schedule_id: None,
                        bus_id: bus.id,
                        date,
                        active: true,
                        notes: None,
                    })
                    .await?;
                    created += 1;
                }
            }
        }
        Ok(created)
    }

    /// Document types, a stamp covering the current year and one register.
    async fn fiscal(&self) -> Result<(), AppError> {
        let doc_repo = DocumentTypeRepository::new(self.pool.clone());
        for (code, name, requires_registered_customer) in DOCUMENT_TYPES {
            if doc_repo.find_by_code(code).await?.is_none() {
                doc_repo
                    .create(&DocumentTypeInput {
                        code: code.to_string(),
                        name: name.to_string(),
                        description: None,
                        requires_registered_customer,
                    })
                    .await?;
            }
        }

        let year = Utc::now().date_naive().year();
        let stamp_number = format!("1234{year}");
        let stamp_repo = FiscalStampRepository::new(self.pool.clone());
        if stamp_repo.find_by_number(&stamp_number).await?.is_none() {
            let (Some(valid_from), Some(valid_until)) = (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ) else {
                return Err(AppError::internal("Invalid stamp window"));
            };
            stamp_repo
                .create(&FiscalStampInput {
                    number: stamp_number,
                    valid_from,
                    valid_until,
                    active: true,
                })
                .await?;
        }

        let register_repo = CashRegisterRepository::new(self.pool.clone());
        if register_repo.find_by_name("Caja 1").await?.is_none() {
            register_repo
                .create(&CashRegisterInput {
                    name: "Caja 1".to_string(),
                })
                .await?;
        }
        Ok(())
    }
}
