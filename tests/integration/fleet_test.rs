//! Bus provisioning against a real database.

use axum::http::StatusCode;
use serde_json::json;

use tr4cking_entity::user::UserRole;

use crate::helpers::{STRONG_PASSWORD, TestApp};

#[tokio::test]
async fn test_login_and_me() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    app.create_user("admin", STRONG_PASSWORD, UserRole::Admin).await;

    let token = app.login("admin", STRONG_PASSWORD).await;
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["username"], "admin");
    assert!(me.data().get("password_hash").is_none());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    app.create_user("clerk", STRONG_PASSWORD, UserRole::Clerk).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "clerk", "password": "wrong-password" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_with_database() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["database"], "connected");
}

#[tokio::test]
async fn test_new_bus_gets_one_seat_per_place() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    app.create_user("admin", STRONG_PASSWORD, UserRole::Admin).await;
    let token = app.login("admin", STRONG_PASSWORD).await;

    let company = app
        .request(
            "POST",
            "/api/companies",
            Some(json!({ "name": "NSA Transportes", "ruc": "8000123-0" })),
            Some(&token),
        )
        .await;
    assert_eq!(company.status, StatusCode::CREATED, "{:?}", company.body);

    let bus = app
        .request(
            "POST",
            "/api/buses",
            Some(json!({
                "plate": "ABC123",
                "brand": "Mercedes Benz",
                "model": "O500",
                "capacity": 40,
                "company_id": company.id(),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(bus.status, StatusCode::CREATED, "{:?}", bus.body);

    let seats = app
        .request("GET", &format!("/api/buses/{}/seats", bus.id()), None, Some(&token))
        .await;
    assert_eq!(seats.status, StatusCode::OK);
    let seats = seats.data().as_array().expect("seat list");
    assert_eq!(seats.len(), 40);
    assert!(seats.iter().all(|s| s["state"] == "available"));
    assert_eq!(seats[0]["number"], 1);
    assert_eq!(seats[39]["number"], 40);

    let duplicate = app
        .request(
            "POST",
            "/api/buses",
            Some(json!({ "plate": "ABC123", "capacity": 10, "company_id": company.id() })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}
