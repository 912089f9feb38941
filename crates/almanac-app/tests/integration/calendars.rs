use salvo::http::StatusCode;
use salvo::http::header::{AUTHORIZATION, CONTENT_DISPOSITION};
use salvo::test::{ResponseExt, TestClient};
use serde_json::{Value, json};

use super::helpers::{BASE, TestApp, event_body};

#[test_log::test(tokio::test)]
async fn test_calendar_crud() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;

    let (status, created) = app
        .send(
            TestClient::post(format!("{BASE}/api/calendars/create"))
                .json(&json!({ "name": "  Work  ", "color": "#EF4444" })),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Work");
    assert_eq!(created["is_visible"], true);
    assert_eq!(created["events"], json!([]));
    let id = created["id"].as_str().expect("calendar id").to_string();

    let (status, updated) = app
        .send(
            TestClient::put(format!("{BASE}/api/calendars/{id}/update")).json(&json!({
                "name": "Office",
                "description": "Day job",
                "is_visible": false,
            })),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Office");
    assert_eq!(updated["color"], "#3B82F6");
    assert!(updated.get("events").is_none());

    let (status, listed) = app
        .send(TestClient::get(format!("{BASE}/api/calendars")), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["is_visible"], false);
}

#[test_log::test(tokio::test)]
async fn test_invalid_calendar_lists_field_errors() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;

    let (status, body) = app
        .send(
            TestClient::post(format!("{BASE}/api/calendars/create"))
                .json(&json!({ "name": "", "color": "blue" })),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["color"].is_array());
}

#[test_log::test(tokio::test)]
async fn test_detail_nests_events_and_delete_cascades() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;
    let calendar_id = app.calendar(&token, "Work").await;

    let (status, _) = app
        .send(
            TestClient::post(format!("{BASE}/api/events/create")).json(&event_body(
                &calendar_id,
                &json!({ "frequency": "MONTHLY", "monthly_type": "DATE" }),
            )),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, detail) = app
        .send(
            TestClient::get(format!("{BASE}/api/calendars/{calendar_id}")),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["events"][0]["title"], "Standup");
    assert_eq!(detail["events"][0]["recurrence"]["monthly_type"], "DATE");

    let (status, body) = app
        .send(
            TestClient::delete(format!("{BASE}/api/calendars/{calendar_id}/delete")),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(app.store.event_count(), 0);
    assert_eq!(app.store.recurrence_rule_count(), 0);

    let (status, body) = app
        .send(
            TestClient::get(format!("{BASE}/api/calendars/{calendar_id}")),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Calendar not found.");

    // Deleting again is not an error.
    let (status, _) = app
        .send(
            TestClient::delete(format!("{BASE}/api/calendars/{calendar_id}/delete")),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[test_log::test(tokio::test)]
async fn test_foreign_calendar_is_not_found() {
    let app = TestApp::new();
    let ada = app.register("ada@example.com").await;
    let grace = app.register("grace@example.com").await;
    let calendar_id = app.calendar(&ada, "Work").await;

    let (status, _) = app
        .send(
            TestClient::put(format!("{BASE}/api/calendars/{calendar_id}/update"))
                .json(&json!({ "name": "Mine now" })),
            &grace,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            TestClient::get(format!("{BASE}/api/calendars/not-a-uuid")),
            &ada,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_calendar_export_is_named() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;
    let calendar_id = app.calendar(&token, "Team Sync").await;

    app.send(
        TestClient::post(format!("{BASE}/api/events/create")).json(&event_body(
            &calendar_id,
            &json!({ "is_all_day": true }),
        )),
        &token,
    )
    .await;

    let mut res = TestClient::get(format!("{BASE}/api/calendars/{calendar_id}/export"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
        .send(&app.service)
        .await;

    assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
    let disposition = res
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(
        disposition.as_deref(),
        Some("attachment; filename=\"team-sync.ics\"")
    );

    let document = res.take_string().await.expect("body");
    assert!(document.contains("X-WR-CALNAME:Team Sync\r\n"));
    assert!(document.contains("DTSTART;VALUE=DATE:20300408\r\n"));
    assert!(document.contains("DTEND;VALUE=DATE:20300409\r\n"));
    assert!(!document.contains("RRULE"));
}
