//! Router-level tests driving the JSON API end to end.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt as _;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use loanbook_server::config::ServerConfig;
use loanbook_server::state::AppState;

fn test_app() -> Router {
    loanbook_server::app(AppState::new(ServerConfig::default()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn register(app: &Router, username: &str, roles: &[&str]) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": format!("{username}-password"),
            "fullName": username,
            "roles": roles,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn health_endpoint() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));
}

#[tokio::test]
async fn register_login_and_token_use() {
    let app = test_app();
    register(&app, "morgan", &[]).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "morgan@example.com", "password": "morgan-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "morgan");
    assert_eq!(body["roles"], json!(["USER"]));
    let token = body["token"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, "GET", "/api/loans/my-loans", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    register(&app, "morgan", &[]).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "morgan",
            "email": "different@example.com",
            "password": "long-enough",
            "fullName": "Morgan",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let app = test_app();
    register(&app, "morgan", &[]).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "morgan@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/loans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/loans", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn loan_lifecycle_over_http() {
    let app = test_app();
    let admin = register(&app, "admin", &["ADMIN", "USER"]).await;
    let morgan = register(&app, "morgan", &[]).await;

    // Request a loan.
    let (status, loan) = send(
        &app,
        "POST",
        "/api/loans",
        Some(&morgan),
        Some(json!({"amount": "5000.00", "term": 12, "purpose": "Home improvements"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loan["status"], "PENDING");
    assert_eq!(loan["amount"], "5000.00");
    assert_eq!(loan["username"], "morgan");
    let loan_id = loan["id"].as_i64().unwrap();

    // Owner listing includes it; admin listing sees everything.
    let (status, mine) = send(&app, "GET", "/api/loans", Some(&morgan), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, all) = send(&app, "GET", "/api/loans/admin/all", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, pending) =
        send(&app, "GET", "/api/loans/admin/pending", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);

    // Review it (lowercase action is accepted).
    let (status, reviewed) = send(
        &app,
        "PUT",
        &format!("/api/loans/admin/review/{loan_id}"),
        Some(&admin),
        Some(json!({"action": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "APPROVED");
    assert_eq!(reviewed["statusDisplayName"], "Approved");
    assert_eq!(reviewed["rejectionReason"], Value::Null);
    assert_eq!(reviewed["reviewedByUsername"], "admin");

    // Reviewing again conflicts, whatever the action.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/loans/admin/review/{loan_id}"),
        Some(&admin),
        Some(json!({"action": "REJECTED", "rejectionReason": "changed my mind"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The owner sees the settled loan; the cached lists reflect the review.
    let (status, fetched) = send(
        &app,
        "GET",
        &format!("/api/loans/{loan_id}"),
        Some(&morgan),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "APPROVED");

    let (status, pending) =
        send(&app, "GET", "/api/loans/admin/pending", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending, json!([]));
}

#[tokio::test]
async fn admin_gates_and_ownership() {
    let app = test_app();
    let admin = register(&app, "admin", &["ADMIN"]).await;
    let morgan = register(&app, "morgan", &[]).await;
    let sam = register(&app, "sam", &[]).await;

    // Non-admins cannot reach the admin surface.
    for uri in [
        "/api/loans/admin/all",
        "/api/loans/admin/pending",
        "/api/statistics/global",
    ] {
        let (status, _) = send(&app, "GET", uri, Some(&morgan), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri} should be admin only");
    }

    let (status, _) = send(
        &app,
        "PUT",
        "/api/loans/admin/review/1",
        Some(&morgan),
        Some(json!({"action": "APPROVED"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admins cannot request loans.
    let (status, _) = send(
        &app,
        "POST",
        "/api/loans",
        Some(&admin),
        Some(json!({"amount": "5000.00", "term": 12, "purpose": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A stranger cannot see another user's loan.
    let (_, loan) = send(
        &app,
        "POST",
        "/api/loans",
        Some(&morgan),
        Some(json!({"amount": "5000.00", "term": 12, "purpose": ""})),
    )
    .await;
    let loan_id = loan["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/loans/{loan_id}"),
        Some(&sam),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn undersized_requests_are_bad_requests() {
    let app = test_app();
    let morgan = register(&app, "morgan", &[]).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/loans",
        Some(&morgan),
        Some(json!({"amount": "99.99", "term": 12, "purpose": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/loans",
        Some(&morgan),
        Some(json!({"amount": "5000.00", "term": 0, "purpose": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_loan_is_not_found() {
    let app = test_app();
    let admin = register(&app, "admin", &["ADMIN"]).await;

    let (status, _) = send(&app, "GET", "/api/loans/404", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/loans/admin/review/404",
        Some(&admin),
        Some(json!({"action": "APPROVED"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn statistics_over_http() {
    let app = test_app();
    let admin = register(&app, "admin", &["ADMIN"]).await;
    let morgan = register(&app, "morgan", &[]).await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/loans",
            Some(&morgan),
            Some(json!({"amount": "1000.00", "term": 12, "purpose": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, stats) = send(&app, "GET", "/api/statistics/global", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalLoans"], 2);
    assert_eq!(stats["pendingLoans"], 2);
    assert_eq!(stats["approvalRate"], 0.0);

    let (status, stats) = send(&app, "GET", "/api/statistics/user", Some(&morgan), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalLoans"], 2);
    assert!(stats.get("approvalRate").is_none());
}
