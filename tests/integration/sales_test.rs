//! Ticket sales, seat occupancy and invoicing against a real database.

use axum::http::StatusCode;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde_json::{Value, json};

use tr4cking_entity::user::UserRole;

use crate::helpers::{STRONG_PASSWORD, TestApp, TestResponse};

/// A company, a four-seat bus, a route with a trip today, a passenger and
/// an employee record for the logged-in admin.
struct Fixture {
    token: String,
    company_id: i64,
    bus_id: i64,
    route_id: i64,
    trip_id: i64,
    passenger_id: i64,
}

async fn post(app: &TestApp, path: &str, body: Value, token: &str) -> i64 {
    let response = app.request("POST", path, Some(body), Some(token)).await;
    assert_eq!(response.status, StatusCode::CREATED, "POST {path}: {:?}", response.body);
    response.id()
}

async fn get(app: &TestApp, path: &str, token: &str) -> Value {
    let response = app.request("GET", path, None, Some(token)).await;
    assert_eq!(response.status, StatusCode::OK, "GET {path}: {:?}", response.body);
    response.data().clone()
}

async fn fixture(app: &TestApp) -> Fixture {
    let admin_id = app.create_user("admin", STRONG_PASSWORD, UserRole::Admin).await;
    let token = app.login("admin", STRONG_PASSWORD).await;

    let company_id = post(
        app,
        "/api/companies",
        json!({ "name": "NSA Transportes", "ruc": "8000123-0" }),
        &token,
    )
    .await;
    let bus_id = post(
        app,
        "/api/buses",
        json!({ "plate": "XYZ123", "capacity": 4, "company_id": company_id }),
        &token,
    )
    .await;
    let route_id = post(
        app,
        "/api/routes",
        json!({ "name": "Asunción - Encarnación", "base_price": 110000 }),
        &token,
    )
    .await;
    let trip_id = post(
        app,
        "/api/trips",
        json!({
            "route_id": route_id,
            "bus_id": bus_id,
            "date": Utc::now().date_naive().to_string(),
        }),
        &token,
    )
    .await;

    let person_id = post(
        app,
        "/api/persons",
        json!({ "document_number": "1234567", "first_name": "Juan", "last_name": "Pérez" }),
        &token,
    )
    .await;
    let passenger_id =
        post(app, "/api/passengers", json!({ "person_id": person_id }), &token).await;
    post(
        app,
        "/api/employees",
        json!({
            "person_id": person_id,
            "user_id": admin_id,
            "company_id": company_id,
            "position": "Boletero",
            "hired_on": "2024-01-15",
        }),
        &token,
    )
    .await;

    Fixture {
        token,
        company_id,
        bus_id,
        route_id,
        trip_id,
        passenger_id,
    }
}

async fn trip_seats(app: &TestApp, fx: &Fixture) -> Vec<Value> {
    let data = get(app, &format!("/api/trips/{}/seats", fx.trip_id), &fx.token).await;
    data.as_array().cloned().expect("seat list")
}

async fn bus_seats(app: &TestApp, fx: &Fixture, bus_id: i64) -> Vec<Value> {
    let data = get(app, &format!("/api/buses/{bus_id}/seats"), &fx.token).await;
    data.as_array().cloned().expect("seat list")
}

fn seat_id(seats: &[Value], index: usize) -> i64 {
    seats[index]["id"].as_i64().expect("seat id")
}

async fn sell(app: &TestApp, fx: &Fixture, seat_id: i64) -> TestResponse {
    app.request(
        "POST",
        "/api/tickets",
        Some(json!({
            "trip_id": fx.trip_id,
            "seat_id": seat_id,
            "passenger_id": fx.passenger_id,
        })),
        Some(&fx.token),
    )
    .await
}

fn trip_body(fx: &Fixture, bus_id: i64, date: NaiveDate) -> Value {
    json!({ "route_id": fx.route_id, "bus_id": bus_id, "date": date.to_string() })
}

fn bus_body(fx: &Fixture, capacity: i32) -> Value {
    json!({ "plate": "XYZ123", "capacity": capacity, "company_id": fx.company_id })
}

/// A document type, a stamp valid today and a closed register.
struct Fiscal {
    document_type_id: i64,
    stamp_id: i64,
    register_id: i64,
}

async fn fiscal(app: &TestApp, fx: &Fixture) -> Fiscal {
    let today = Utc::now().date_naive();
    let document_type_id = post(
        app,
        "/api/document-types",
        json!({ "code": "FC", "name": "Factura contado" }),
        &fx.token,
    )
    .await;
    let stamp_id = post(
        app,
        "/api/fiscal-stamps",
        json!({
            "number": "12345678",
            "valid_from": (today - Duration::days(30)).to_string(),
            "valid_until": (today + Duration::days(335)).to_string(),
        }),
        &fx.token,
    )
    .await;
    let register_id =
        post(app, "/api/cash-registers", json!({ "name": "Caja 1" }), &fx.token).await;
    Fiscal {
        document_type_id,
        stamp_id,
        register_id,
    }
}

fn invoice_body(fiscal: &Fiscal, quantity: i64, unit_price: i64) -> Value {
    json!({
        "document_type_id": fiscal.document_type_id,
        "stamp_id": fiscal.stamp_id,
        "lines": [{
            "description": "Pasaje Asunción - Encarnación",
            "quantity": quantity,
            "unit_price": unit_price,
            "vat_rate": 10,
        }],
    })
}

/// Open the register and return the session id.
async fn open_register(app: &TestApp, fx: &Fixture, fiscal: &Fiscal, amount: i64) -> i64 {
    post(
        app,
        &format!("/api/cash-registers/{}/open", fiscal.register_id),
        json!({ "opening_amount": amount }),
        &fx.token,
    )
    .await
}

#[tokio::test]
async fn test_ticket_occupies_and_cancel_releases_seat() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;

    let seats = trip_seats(&app, &fx).await;
    assert_eq!(seats.len(), 4);
    let seat_id = seat_id(&seats, 0);

    let ticket = sell(&app, &fx, seat_id).await;
    assert_eq!(ticket.status, StatusCode::CREATED, "{:?}", ticket.body);
    let ticket_id = ticket.id();

    let seats = trip_seats(&app, &fx).await;
    assert_eq!(seats[0]["state"], "occupied");
    assert_eq!(seats[0]["ticket_id"], ticket_id);
    assert_eq!(seats[1]["state"], "available");

    // Same seat again.
    let second = sell(&app, &fx, seat_id).await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let cancelled = app
        .request("DELETE", &format!("/api/tickets/{ticket_id}"), None, Some(&fx.token))
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{:?}", cancelled.body);
    assert_eq!(cancelled.data()["seat_id"], seat_id);

    let seats = trip_seats(&app, &fx).await;
    assert_eq!(seats[0]["state"], "available");
    assert!(seats[0]["ticket_id"].is_null());
}

#[tokio::test]
async fn test_ticket_seat_change_moves_occupancy() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let seats = trip_seats(&app, &fx).await;
    let (first, second, third) = (seat_id(&seats, 0), seat_id(&seats, 1), seat_id(&seats, 2));

    let ticket_id = sell(&app, &fx, first).await.id();
    assert_eq!(sell(&app, &fx, third).await.status, StatusCode::CREATED);

    let moved = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}"),
            Some(json!({
                "trip_id": fx.trip_id,
                "seat_id": second,
                "passenger_id": fx.passenger_id,
            })),
            Some(&fx.token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["seat_id"], second);

    let seats = trip_seats(&app, &fx).await;
    assert_eq!(seats[0]["state"], "available");
    assert_eq!(seats[1]["state"], "occupied");
    assert_eq!(seats[1]["ticket_id"], ticket_id);

    // Onto a seat someone else holds.
    let taken = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}"),
            Some(json!({
                "trip_id": fx.trip_id,
                "seat_id": third,
                "passenger_id": fx.passenger_id,
            })),
            Some(&fx.token),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT, "{:?}", taken.body);
    assert_eq!(trip_seats(&app, &fx).await[1]["ticket_id"], ticket_id);
}

#[tokio::test]
async fn test_deleting_passenger_or_trip_releases_seats() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let seats = trip_seats(&app, &fx).await;

    sell(&app, &fx, seat_id(&seats, 0)).await.id();
    let passenger_path = format!("/api/passengers/{}", fx.passenger_id);
    let deleted = app
        .request("DELETE", &passenger_path, None, Some(&fx.token))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT, "{:?}", deleted.body);
    assert_eq!(trip_seats(&app, &fx).await[0]["state"], "available");

    let person_id = post(
        &app,
        "/api/persons",
        json!({ "document_number": "7654321", "first_name": "Ana", "last_name": "Gómez" }),
        &fx.token,
    )
    .await;
    let passenger_id =
        post(&app, "/api/passengers", json!({ "person_id": person_id }), &fx.token).await;
    let fx = Fixture { passenger_id, ..fx };

    sell(&app, &fx, seat_id(&seats, 1)).await.id();
    assert_eq!(bus_seats(&app, &fx, fx.bus_id).await[1]["state"], "occupied");

    let deleted = app
        .request("DELETE", &format!("/api/trips/{}", fx.trip_id), None, Some(&fx.token))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT, "{:?}", deleted.body);
    let seats = bus_seats(&app, &fx, fx.bus_id).await;
    assert!(seats.iter().all(|seat| seat["state"] == "available"), "{seats:?}");
}

#[tokio::test]
async fn test_trip_bus_change_refused_while_tickets_sold() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let today = Utc::now().date_naive();
    let other_bus = post(
        &app,
        "/api/buses",
        json!({ "plate": "ABC987", "capacity": 4, "company_id": fx.company_id }),
        &fx.token,
    )
    .await;

    let ticket_id = sell(&app, &fx, seat_id(&trip_seats(&app, &fx).await, 0)).await.id();

    let swapped = app
        .request(
            "PUT",
            &format!("/api/trips/{}", fx.trip_id),
            Some(trip_body(&fx, other_bus, today)),
            Some(&fx.token),
        )
        .await;
    assert_eq!(swapped.status, StatusCode::CONFLICT, "{:?}", swapped.body);
    let trip = get(&app, &format!("/api/trips/{}", fx.trip_id), &fx.token).await;
    assert_eq!(trip["bus_id"], fx.bus_id);
    assert_eq!(trip_seats(&app, &fx).await[0]["ticket_id"], ticket_id);

    // Other fields may still change.
    let moved = app
        .request(
            "PUT",
            &format!("/api/trips/{}", fx.trip_id),
            Some(trip_body(&fx, fx.bus_id, today + Duration::days(1))),
            Some(&fx.token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);

    let cancelled = app
        .request("DELETE", &format!("/api/tickets/{ticket_id}"), None, Some(&fx.token))
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);

    let swapped = app
        .request(
            "PUT",
            &format!("/api/trips/{}", fx.trip_id),
            Some(trip_body(&fx, other_bus, today)),
            Some(&fx.token),
        )
        .await;
    assert_eq!(swapped.status, StatusCode::OK, "{:?}", swapped.body);
    assert_eq!(swapped.data()["bus_id"], other_bus);
    let seats = trip_seats(&app, &fx).await;
    assert_eq!(seats.len(), 4);
    assert!(seats.iter().all(|seat| seat["ticket_id"].is_null()));
}

#[tokio::test]
async fn test_capacity_change_keeps_sold_seats() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    sell(&app, &fx, seat_id(&trip_seats(&app, &fx).await, 3)).await.id();
    let path = format!("/api/buses/{}", fx.bus_id);

    let shrink = app
        .request("PUT", &path, Some(bus_body(&fx, 2)), Some(&fx.token))
        .await;
    assert_eq!(shrink.status, StatusCode::CONFLICT, "{:?}", shrink.body);
    assert_eq!(bus_seats(&app, &fx, fx.bus_id).await.len(), 4);

    let grow = app
        .request("PUT", &path, Some(bus_body(&fx, 6)), Some(&fx.token))
        .await;
    assert_eq!(grow.status, StatusCode::OK, "{:?}", grow.body);
    assert_eq!(grow.data()["capacity"], 6);
    let seats = bus_seats(&app, &fx, fx.bus_id).await;
    let numbers: Vec<i64> = seats.iter().filter_map(|s| s["number"].as_i64()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(seats[3]["state"], "occupied");
    assert_eq!(seats[5]["state"], "available");

    // Seats above the sold one are free to go.
    let trim = app
        .request("PUT", &path, Some(bus_body(&fx, 4)), Some(&fx.token))
        .await;
    assert_eq!(trim.status, StatusCode::OK, "{:?}", trim.body);
    assert_eq!(bus_seats(&app, &fx, fx.bus_id).await.len(), 4);
}

#[tokio::test]
async fn test_trip_must_fall_on_schedule_weekday() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    // Runs only on tomorrow's weekday.
    let mut mask = ['0'; 7];
    mask[tomorrow.weekday().num_days_from_monday() as usize] = '1';
    let weekdays: String = mask.iter().collect();
    let schedule_id = post(
        &app,
        "/api/schedules",
        json!({ "route_id": fx.route_id, "departure_time": "08:00:00", "weekdays": weekdays }),
        &fx.token,
    )
    .await;

    let scheduled = |date: NaiveDate| {
        json!({
            "route_id": fx.route_id,
            "schedule_id": schedule_id,
            "bus_id": fx.bus_id,
            "date": date.to_string(),
        })
    };

    let off_day = scheduled(tomorrow - Duration::days(1));
    let off_day = app
        .request("POST", "/api/trips", Some(off_day), Some(&fx.token))
        .await;
    assert_eq!(off_day.status, StatusCode::BAD_REQUEST, "{:?}", off_day.body);
    assert_eq!(off_day.body["error"], "VALIDATION_ERROR");

    let on_day = app
        .request("POST", "/api/trips", Some(scheduled(tomorrow)), Some(&fx.token))
        .await;
    assert_eq!(on_day.status, StatusCode::CREATED, "{:?}", on_day.body);
    assert_eq!(on_day.data()["schedule_id"], schedule_id);
}

#[tokio::test]
async fn test_invoice_requires_open_register() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let fiscal = fiscal(&app, &fx).await;
    let invoice = invoice_body(&fiscal, 1, 110000);

    let refused = app
        .request("POST", "/api/invoices", Some(invoice.clone()), Some(&fx.token))
        .await;
    assert_eq!(refused.status, StatusCode::CONFLICT, "{:?}", refused.body);

    open_register(&app, &fx, &fiscal, 100000).await;

    let issued = app
        .request("POST", "/api/invoices", Some(invoice), Some(&fx.token))
        .await;
    assert_eq!(issued.status, StatusCode::CREATED, "{:?}", issued.body);
    assert_eq!(issued.data()["number"], "001-001-0000001");
    assert_eq!(issued.data()["total_amount"], 110000);
    assert_eq!(issued.data()["cash_register_id"], fiscal.register_id);
    assert_eq!(issued.data()["lines"].as_array().map(Vec::len), Some(1));

    let reopen = app
        .request(
            "POST",
            &format!("/api/cash-registers/{}/open", fiscal.register_id),
            Some(json!({ "opening_amount": 0 })),
            Some(&fx.token),
        )
        .await;
    assert_eq!(reopen.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_oversized_invoice_amounts_are_rejected() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let fiscal = fiscal(&app, &fx).await;
    open_register(&app, &fx, &fiscal, 0).await;

    let huge = app
        .request(
            "POST",
            "/api/invoices",
            Some(invoice_body(&fiscal, 3, 4_611_686_018_427_387_904)),
            Some(&fx.token),
        )
        .await;
    assert_eq!(huge.status, StatusCode::BAD_REQUEST, "{:?}", huge.body);
    assert_eq!(huge.body["error"], "VALIDATION_ERROR");

    let invoices = get(&app, "/api/invoices", &fx.token).await;
    assert_eq!(invoices["total_items"], 0);
}

#[tokio::test]
async fn test_void_and_close_balance_the_register() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let fiscal = fiscal(&app, &fx).await;
    let session_id = open_register(&app, &fx, &fiscal, 100000).await;
    let transactions = format!("/api/register-sessions/{session_id}/transactions");

    let invoice_id =
        post(&app, "/api/invoices", invoice_body(&fiscal, 1, 110000), &fx.token).await;
    post(&app, "/api/invoices", invoice_body(&fiscal, 2, 25000), &fx.token).await;

    let void_path = format!("/api/invoices/{invoice_id}/void");
    let voided = app.request("POST", &void_path, None, Some(&fx.token)).await;
    assert_eq!(voided.status, StatusCode::OK, "{:?}", voided.body);
    assert_eq!(voided.data()["status"], "voided");

    let again = app.request("POST", &void_path, None, Some(&fx.token)).await;
    assert_eq!(again.status, StatusCode::CONFLICT, "{:?}", again.body);

    let history = get(&app, &format!("/api/invoices/{invoice_id}/history"), &fx.token).await;
    let history = history.as_array().cloned().expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["field"], "status");
    assert_eq!(history[0]["old_value"], "issued");
    assert_eq!(history[0]["new_value"], "voided");

    post(
        &app,
        &transactions,
        json!({ "kind": "expense", "amount": 5000, "description": "Combustible" }),
        &fx.token,
    )
    .await;

    let movements = get(&app, &transactions, &fx.token).await;
    let movements = movements.as_array().cloned().expect("movements");
    let voids: Vec<&Value> = movements
        .iter()
        .filter(|m| m["invoice_id"] == invoice_id && m["kind"] == "expense")
        .collect();
    assert_eq!(voids.len(), 1);
    assert_eq!(voids[0]["amount"], 110000);
    assert_eq!(movements.len(), 4);

    // 100000 + (110000 + 50000) - (110000 + 5000)
    let closed = app
        .request(
            "POST",
            &format!("/api/cash-registers/{}/close", fiscal.register_id),
            Some(json!({ "closing_amount": 144000 })),
            Some(&fx.token),
        )
        .await;
    assert_eq!(closed.status, StatusCode::OK, "{:?}", closed.body);
    let closing = closed.data();
    assert_eq!(closing["income"], 160000);
    assert_eq!(closing["expense"], 115000);
    assert_eq!(closing["expected_amount"], 145000);
    assert_eq!(closing["closing_amount"], 144000);
    assert_eq!(closing["difference"], -1000);

    let late = app
        .request(
            "POST",
            &transactions,
            Some(json!({ "kind": "income", "amount": 1000 })),
            Some(&fx.token),
        )
        .await;
    assert_eq!(late.status, StatusCode::CONFLICT, "{:?}", late.body);
}

#[tokio::test]
async fn test_concurrent_invoices_get_distinct_numbers() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let fx = fixture(&app).await;
    let fiscal = fiscal(&app, &fx).await;
    open_register(&app, &fx, &fiscal, 0).await;
    let second_register =
        post(&app, "/api/cash-registers", json!({ "name": "Caja 2" }), &fx.token).await;
    open_register(
        &app,
        &fx,
        &Fiscal {
            register_id: second_register,
            ..fiscal
        },
        0,
    )
    .await;

    let on_register = |register_id: i64| {
        let mut body = invoice_body(&fiscal, 1, 55000);
        body["cash_register_id"] = json!(register_id);
        body
    };
    let issue = |body: Value| app.request("POST", "/api/invoices", Some(body), Some(&fx.token));

    let (a, b, c, d) = tokio::join!(
        issue(on_register(fiscal.register_id)),
        issue(on_register(second_register)),
        issue(on_register(fiscal.register_id)),
        issue(on_register(second_register)),
    );

    let mut numbers = Vec::new();
    for response in [a, b, c, d] {
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        numbers.push(response.data()["number"].as_str().expect("number").to_string());
    }
    numbers.sort();
    assert_eq!(
        numbers,
        vec!["001-001-0000001", "001-001-0000002", "001-001-0000003", "001-001-0000004"]
    );
}
