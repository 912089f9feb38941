use salvo::http::StatusCode;
use salvo::http::header::{AUTHORIZATION, CONTENT_TYPE};
use salvo::test::{ResponseExt, TestClient};
use serde_json::{Value, json};

use super::helpers::{BASE, TestApp, event_body};

#[test_log::test(tokio::test)]
async fn test_recurrence_lifecycle_over_http() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;
    let calendar_id = app.calendar(&token, "Work").await;

    let (status, created) = app
        .send(
            TestClient::post(format!("{BASE}/api/events/create")).json(&event_body(
                &calendar_id,
                &json!({ "frequency": "WEEKLY", "interval": 1, "weekdays": [1, 3, 5] }),
            )),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["recurrence"]["frequency"], "WEEKLY");
    assert_eq!(created["recurrence"]["weekdays"], json!([1, 3, 5]));
    let id = created["id"].as_str().expect("event id").to_string();

    // Only the interval is sent: the stored weekdays survive the merge.
    let (status, merged) = app
        .send(
            TestClient::put(format!("{BASE}/api/events/{id}/update"))
                .json(&event_body(&calendar_id, &json!({ "interval": 2 }))),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["recurrence"]["interval"], 2);
    assert_eq!(merged["recurrence"]["weekdays"], json!([1, 3, 5]));
    assert_eq!(merged["recurrence"]["id"], created["recurrence"]["id"]);

    let (status, detached) = app
        .send(
            TestClient::put(format!("{BASE}/api/events/{id}/update"))
                .json(&event_body(&calendar_id, &json!({ "frequency": "" }))),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detached["recurrence"], Value::Null);
    assert_eq!(app.store.recurrence_rule_count(), 0);

    let (status, reattached) = app
        .send(
            TestClient::put(format!("{BASE}/api/events/{id}/update")).json(&event_body(
                &calendar_id,
                &json!({ "frequency": "DAILY", "interval": 1 }),
            )),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reattached["recurrence"]["frequency"], "DAILY");
    assert_eq!(app.store.recurrence_rule_count(), 1);

    let (status, body) = app
        .send(
            TestClient::delete(format!("{BASE}/api/events/{id}/delete")),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert_eq!(app.store.recurrence_rule_count(), 0);
    assert_eq!(app.store.event_count(), 0);

    let (status, body) = app
        .send(TestClient::get(format!("{BASE}/api/events/{id}")), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Event not found.");
}

#[test_log::test(tokio::test)]
async fn test_invalid_event_is_rejected_without_writes() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;
    let calendar_id = app.calendar(&token, "Work").await;

    let (status, body) = app
        .send(
            TestClient::post(format!("{BASE}/api/events/create")).json(&event_body(
                &calendar_id,
                &json!({
                    "end_time": "2030-04-08T08:00:00Z",
                    "frequency": "DAILY",
                    "interval": 400,
                }),
            )),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["end_time"].is_array());
    assert!(body["errors"]["interval"].is_array());
    assert_eq!(app.store.event_count(), 0);
    assert_eq!(app.store.recurrence_rule_count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;

    let (status, body) = app
        .send(
            TestClient::post(format!("{BASE}/api/events/create"))
                .json(&json!({ "title": "No times" })),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_events_are_owner_scoped() {
    let app = TestApp::new();
    let ada = app.register("ada@example.com").await;
    let grace = app.register("grace@example.com").await;
    let calendar_id = app.calendar(&ada, "Work").await;

    let (_, created) = app
        .send(
            TestClient::post(format!("{BASE}/api/events/create"))
                .json(&event_body(&calendar_id, &json!({}))),
            &ada,
        )
        .await;
    let id = created["id"].as_str().expect("event id").to_string();

    let (status, _) = app
        .send(TestClient::get(format!("{BASE}/api/events/{id}")), &grace)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            TestClient::delete(format!("{BASE}/api/events/{id}/delete")),
            &grace,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Grace cannot file an event into Ada's calendar either.
    let (status, body) = app
        .send(
            TestClient::post(format!("{BASE}/api/events/create"))
                .json(&event_body(&calendar_id, &json!({}))),
            &grace,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Calendar not found.");

    let (_, listed) = app
        .send(TestClient::get(format!("{BASE}/api/events")), &grace)
        .await;
    assert_eq!(listed, json!([]));
    assert_eq!(app.store.event_count(), 1);
}

#[test_log::test(tokio::test)]
async fn test_list_is_newest_first_with_calendar() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;
    let calendar_id = app.calendar(&token, "Work").await;

    for (title, start, end) in [
        ("Early", "2030-01-01T09:00:00Z", "2030-01-01T10:00:00Z"),
        ("Late", "2030-06-01T09:00:00Z", "2030-06-01T10:00:00Z"),
    ] {
        let (status, _) = app
            .send(
                TestClient::post(format!("{BASE}/api/events/create")).json(&event_body(
                    &calendar_id,
                    &json!({ "title": title, "start_time": start, "end_time": end }),
                )),
                &token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = app
        .send(TestClient::get(format!("{BASE}/api/events")), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["title"], "Late");
    assert_eq!(listed[1]["title"], "Early");
    assert_eq!(listed[0]["calendar"]["name"], "Work");
    assert_eq!(listed[0]["user"]["email"], "ada@example.com");
    assert_eq!(listed[0]["recurrence"], Value::Null);
    assert_eq!(listed[0]["color"], Value::Null);
}

#[test_log::test(tokio::test)]
async fn test_export_all_events() {
    let app = TestApp::new();
    let token = app.register("ada@example.com").await;
    let calendar_id = app.calendar(&token, "Work").await;

    app.send(
        TestClient::post(format!("{BASE}/api/events/create")).json(&event_body(
            &calendar_id,
            &json!({ "frequency": "WEEKLY", "weekdays": [1, 3] }),
        )),
        &token,
    )
    .await;

    let mut res = TestClient::get(format!("{BASE}/api/events/export"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
        .send(&app.service)
        .await;

    assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(
        content_type.as_deref(),
        Some("text/calendar; charset=utf-8")
    );

    let document = res.take_string().await.expect("body");
    assert!(document.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(document.contains("SUMMARY:Standup\r\n"));
    assert!(document.contains("RRULE:FREQ=WEEKLY;BYDAY=MO,WE\r\n"));
    assert!(document.contains(&format!("CATEGORIES:{calendar_id}\r\n")));
}
