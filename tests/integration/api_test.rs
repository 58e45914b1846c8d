//! Routing, authentication and error mapping. No database required.

use axum::http::StatusCode;
use serde_json::json;

use tr4cking_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.data()["status"], "degraded");
    assert_eq!(response.data()["database"], "unreachable");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/buses", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::offline();

    let response = app
        .request("GET", "/api/roles", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_validates_payload() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "", "password": "" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::offline();
    let token = app.token_for(1, UserRole::Admin, "admin");

    let response = app
        .request("POST", "/api/companies", Some(json!({ "name": 42 })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_roles_listing() {
    let app = TestApp::offline();
    let token = app.token_for(7, UserRole::Viewer, "viewer");

    let response = app.request("GET", "/api/roles", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let roles = response.data().as_array().expect("roles array");
    assert_eq!(roles.len(), UserRole::ALL.len());
    assert!(roles.iter().any(|r| r["role"] == "admin"));
}

#[tokio::test]
async fn test_viewer_cannot_write_catalog() {
    let app = TestApp::offline();
    let token = app.token_for(7, UserRole::Viewer, "viewer");

    let response = app
        .request(
            "POST",
            "/api/companies",
            Some(json!({ "name": "NSA Transportes", "ruc": "8000123-0" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_clerk_cannot_manage_users() {
    let app = TestApp::offline();
    let token = app.token_for(3, UserRole::Clerk, "clerk");

    let response = app.request("GET", "/api/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
