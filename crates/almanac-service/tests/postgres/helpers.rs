//! Test helpers for the `PgStore` tests.
//!
//! The database named by `DATABASE_URL` is migrated once per run and shared by
//! all tests. Each test works under a freshly registered owner, and every store
//! call is owner-scoped, so tests can run in parallel.

use almanac_core::model::{
    CalendarFields, EventFields, RecurrenceBundle, RecurrenceInput, RecurrencePattern,
};
use almanac_db::db::connection::{DbPool, create_pool};
use almanac_db::db::migrations::run_migrations;
use almanac_db::db::schema::recurrence_rule;
use almanac_service::store::{AccountStore, CalendarStore, NewAccount, PgStore};
use chrono::{TimeZone, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;
use tokio::sync::OnceCell;
use uuid::Uuid;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// A migrated database with one owner and one calendar.
pub struct TestDb {
    pub store: PgStore,
    pub owner: Uuid,
    pub calendar_id: Uuid,
    pool: DbPool,
}

#[derive(QueryableByName)]
struct Count {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

impl TestDb {
    /// Returns `None` when no database is configured.
    ///
    /// ## Panics
    /// Panics if the configured database cannot be migrated or reached.
    pub async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("[TestDb] DATABASE_URL is not set, skipping");
            return None;
        };

        let migrate_url = url.clone();
        MIGRATED
            .get_or_init(|| async move {
                run_migrations(&migrate_url)
                    .await
                    .expect("migrations should apply");
            })
            .await;

        let pool = create_pool(&url, 4).await.expect("pool should build");
        let store = PgStore::new(pool.clone());

        let owner = store
            .insert_account(NewAccount {
                email: format!("{}@example.test", Uuid::now_v7()),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone_number: None,
                password_hash: "unused".to_string(),
            })
            .await
            .expect("account")
            .id;
        let calendar_id = store
            .insert_calendar(owner, &calendar_fields("Work"))
            .await
            .expect("calendar")
            .id;

        Some(Self {
            store,
            owner,
            calendar_id,
            pool,
        })
    }

    pub async fn rule_exists(&self, id: Uuid) -> bool {
        let mut conn = self.pool.get().await.expect("connection");
        let found: i64 = recurrence_rule::table
            .filter(recurrence_rule::id.eq(id))
            .count()
            .get_result(&mut conn)
            .await
            .expect("rule count");
        found == 1
    }

    /// Rules that no event links to. Always zero in a consistent database.
    pub async fn orphan_rules(&self) -> i64 {
        let mut conn = self.pool.get().await.expect("connection");
        diesel::sql_query(
            "SELECT COUNT(*) AS n FROM recurrence_rule r \
             WHERE NOT EXISTS (SELECT 1 FROM event e WHERE e.recurrence_id = r.id)",
        )
        .get_result::<Count>(&mut conn)
        .await
        .expect("orphan count")
        .n
    }
}

#[must_use]
pub fn calendar_fields(name: &str) -> CalendarFields {
    CalendarFields {
        name: name.to_string(),
        description: String::new(),
        color: "#3B82F6".to_string(),
        is_visible: true,
    }
}

/// ## Panics
/// Panics on an invalid date, which the callers never pass.
#[must_use]
pub fn event_fields(title: &str) -> EventFields {
    EventFields {
        title: title.to_string(),
        description: String::new(),
        start_time: Utc
            .with_ymd_and_hms(2030, 4, 8, 9, 0, 0)
            .single()
            .expect("valid start"),
        end_time: Utc
            .with_ymd_and_hms(2030, 4, 8, 9, 30, 0)
            .single()
            .expect("valid end"),
        color: None,
        is_all_day: false,
    }
}

/// ## Panics
/// Panics if the JSON is not a valid recurrence bundle.
#[must_use]
pub fn bundle(value: serde_json::Value) -> RecurrenceBundle {
    serde_json::from_value::<RecurrenceInput>(value)
        .expect("input")
        .into_bundle()
        .expect("bundle")
}

/// ## Panics
/// Panics if the JSON is not a valid rule definition.
#[must_use]
pub fn pattern(value: serde_json::Value) -> RecurrencePattern {
    RecurrencePattern::from_bundle(&bundle(value)).expect("pattern")
}
