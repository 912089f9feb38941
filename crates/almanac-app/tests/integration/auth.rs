use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::http::StatusCode;
use salvo::http::header::{AUTHORIZATION, COOKIE};
use salvo::test::{ResponseExt, TestClient};
use serde_json::{Value, json};

use super::helpers::{BASE, TestApp};

#[test_log::test(tokio::test)]
async fn test_healthcheck_is_public() {
    let app = TestApp::new();

    let mut res = TestClient::get(format!("{BASE}/api/app/healthcheck"))
        .send(&app.service)
        .await;

    assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
    assert_eq!(res.take_string().await.expect("body"), "OK");
}

#[test_log::test(tokio::test)]
async fn test_protected_routes_need_credentials() {
    let app = TestApp::new();

    for path in ["/api/auth/me", "/api/events", "/api/calendars"] {
        let res = TestClient::get(format!("{BASE}{path}"))
            .send(&app.service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "{path}");
    }

    let res = TestClient::get(format!("{BASE}/api/auth/me"))
        .add_header(AUTHORIZATION, "Bearer not-a-session", true)
        .send(&app.service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
}

#[test_log::test(tokio::test)]
async fn test_register_me_logout() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;

    let (status, body) = app
        .send(TestClient::get(format!("{BASE}/api/auth/me")), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = app
        .send(TestClient::get(format!("{BASE}/api/auth/logout")), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "The user has been logged out successfully."
    );

    let (status, _) = app
        .send(TestClient::get(format!("{BASE}/api/auth/me")), &token)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_login_issues_a_fresh_session() {
    let app = TestApp::new();
    let first = app.register("ada@example.com").await;

    let mut res = TestClient::post(format!("{BASE}/api/auth/login"))
        .json(&json!({ "email": "ADA@example.com", "password": "engine42" }))
        .send(&app.service)
        .await;
    assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
    let body: Value = res.take_json().await.expect("json body");
    let second = body["session"].as_str().expect("token").to_string();
    assert_ne!(first, second);
    assert_eq!(body["user"]["email"], "ada@example.com");

    let res = TestClient::get(format!("{BASE}/api/auth/me"))
        .add_header(COOKIE, format!("almanac_session={second}"), true)
        .send(&app.service)
        .await;
    assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn test_bad_login_is_unauthorized() {
    let app = TestApp::new();
    app.register("ada@example.com").await;

    let mut res = TestClient::post(format!("{BASE}/api/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .send(&app.service)
        .await;

    assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    let body: Value = res.take_json().await.expect("json body");
    assert_eq!(
        body["detail"],
        "Invalid login credentials. Please try again or contact support."
    );
}

#[test_log::test(tokio::test)]
async fn test_basic_credentials_authenticate() {
    let app = TestApp::new();
    app.register("ada@example.com").await;

    let encoded = STANDARD.encode("ada@example.com:engine42");
    let mut res = TestClient::get(format!("{BASE}/api/auth/me"))
        .add_header(AUTHORIZATION, format!("Basic {encoded}"), true)
        .send(&app.service)
        .await;

    assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
    let body: Value = res.take_json().await.expect("json body");
    assert_eq!(body["data"]["first_name"], "Ada");
}

#[test_log::test(tokio::test)]
async fn test_duplicate_registration_is_a_field_error() {
    let app = TestApp::new();
    app.register("ada@example.com").await;

    let mut res = TestClient::post(format!("{BASE}/api/auth/register"))
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Byron",
            "email": "ada@example.com",
            "password": "another1",
        }))
        .send(&app.service)
        .await;

    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    let body: Value = res.take_json().await.expect("json body");
    assert!(body["errors"]["email"].is_array());
}

#[test_log::test(tokio::test)]
async fn test_registration_can_be_closed() {
    let app = TestApp::with_settings(
        "[database]\nbackend = \"memory\"\n[auth]\nallow_registration = false\n",
    );

    let res = TestClient::post(format!("{BASE}/api/auth/register"))
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "password": "engine42",
        }))
        .send(&app.service)
        .await;

    assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
}
