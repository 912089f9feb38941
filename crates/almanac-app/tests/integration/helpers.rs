//! Test helpers for the HTTP integration tests.
//!
//! Every test builds its own service over a fresh `MemoryStore`, so tests are
//! isolated and need no database.

use std::sync::Arc;

use almanac_app::app::api::routes;
use almanac_app::config::{ConfigHandler, Settings};
use almanac_app::store_handler::StoreHandler;
use almanac_service::store::MemoryStore;
use salvo::http::StatusCode;
use salvo::http::header::AUTHORIZATION;
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};
use serde_json::{Value, json};

pub const BASE: &str = "http://127.0.0.1:5800";

/// A service plus a handle on its store for assertions on stored state.
pub struct TestApp {
    pub service: Service,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings("[database]\nbackend = \"memory\"\n")
    }

    /// ## Panics
    /// Panics if the TOML does not produce valid settings.
    #[must_use]
    pub fn with_settings(toml: &str) -> Self {
        let settings = Settings::from_toml(toml).expect("test settings should load");
        let store = Arc::new(MemoryStore::new());
        let router = Router::new()
            .hoop(StoreHandler {
                store: store.clone(),
            })
            .hoop(ConfigHandler { settings })
            .push(routes());
        Self {
            service: Service::new(router),
            store,
        }
    }

    /// Registers a user and returns their session token.
    pub async fn register(&self, email: &str) -> String {
        let mut res = TestClient::post(format!("{BASE}/api/auth/register"))
            .json(&json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "password": "engine42",
            }))
            .send(&self.service)
            .await;
        assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
        let body: Value = res.take_json().await.expect("json body");
        body["session"]
            .as_str()
            .expect("session token")
            .to_string()
    }

    /// Creates a calendar and returns its id.
    pub async fn calendar(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                TestClient::post(format!("{BASE}/api/calendars/create"))
                    .json(&json!({ "name": name })),
                token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().expect("calendar id").to_string()
    }

    /// Sends a request as the owner of `token` and decodes a JSON body, or
    /// `Value::Null` for an empty one.
    pub async fn send(&self, request: RequestBuilder, token: &str) -> (StatusCode, Value) {
        let mut res = request
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&self.service)
            .await;
        let status = res.status_code.unwrap_or(StatusCode::OK);
        let text = res.take_string().await.unwrap_or_default();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("json body")
        };
        (status, body)
    }
}

/// An event body for `calendar_id` with the given extra fields merged in.
#[must_use]
pub fn event_body(calendar_id: &str, extra: &Value) -> Value {
    let mut body = json!({
        "calendar_id": calendar_id,
        "title": "Standup",
        "description": "Daily sync",
        "start_time": "2030-04-08T09:00:00Z",
        "end_time": "2030-04-08T09:30:00Z",
        "is_all_day": false,
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    body
}
