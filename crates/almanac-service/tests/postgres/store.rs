use almanac_core::model::{Frequency, RecurrenceBundle};
use almanac_service::store::{CalendarStore, EventInsert, EventStore, EventUpdate};
use serde_json::json;

use super::helpers::{TestDb, bundle, event_fields, pattern};

async fn recurring_event(db: &TestDb) -> almanac_core::model::Event {
    db.store
        .insert_event(EventInsert {
            owner: db.owner,
            calendar_id: db.calendar_id,
            fields: event_fields("Standup"),
            recurrence: Some(pattern(json!({ "frequency": "WEEKLY", "weekdays": [1, 3, 5] }))),
        })
        .await
        .expect("event inserted")
}

fn overwrite(db: &TestDb, recurrence: RecurrenceBundle) -> EventUpdate {
    EventUpdate {
        calendar_id: db.calendar_id,
        fields: event_fields("Standup"),
        recurrence,
    }
}

#[test_log::test(tokio::test)]
async fn test_insert_links_rule() {
    let Some(db) = TestDb::connect().await else {
        return;
    };

    let event = recurring_event(&db).await;
    let rule = event.recurrence.clone().expect("rule linked");
    assert!(db.rule_exists(rule.id).await);

    let reread = db
        .store
        .get_event(event.id, db.owner)
        .await
        .expect("read")
        .expect("event exists");
    assert_eq!(reread.recurrence, Some(rule));
}

#[test_log::test(tokio::test)]
async fn test_update_merges_into_linked_rule() {
    let Some(db) = TestDb::connect().await else {
        return;
    };
    let event = recurring_event(&db).await;
    let rule_id = event.recurrence.as_ref().map(|r| r.id);

    let updated = db
        .store
        .update_event(event.id, db.owner, overwrite(&db, bundle(json!({ "interval": 2 }))))
        .await
        .expect("updated")
        .expect("event exists");

    let rule = updated.recurrence.expect("still linked");
    assert_eq!(Some(rule.id), rule_id);
    assert_eq!(rule.pattern.interval, 2);
    assert_eq!(rule.pattern.weekdays, Some(vec![1, 3, 5]));

    let reread = db
        .store
        .get_event(event.id, db.owner)
        .await
        .expect("read")
        .expect("event exists");
    assert_eq!(reread.recurrence.map(|r| r.pattern.interval), Some(2));
}

#[test_log::test(tokio::test)]
async fn test_detach_removes_rule_row() {
    let Some(db) = TestDb::connect().await else {
        return;
    };
    let event = recurring_event(&db).await;
    let rule_id = event.recurrence.as_ref().map(|r| r.id).expect("rule linked");

    let updated = db
        .store
        .update_event(event.id, db.owner, overwrite(&db, RecurrenceBundle::default()))
        .await
        .expect("detached")
        .expect("event exists");

    assert!(updated.recurrence.is_none());
    assert!(!db.rule_exists(rule_id).await);
    assert_eq!(db.orphan_rules().await, 0);
}

#[test_log::test(tokio::test)]
async fn test_concurrent_attaches_link_one_rule() {
    let Some(db) = TestDb::connect().await else {
        return;
    };
    let event = db
        .store
        .insert_event(EventInsert {
            owner: db.owner,
            calendar_id: db.calendar_id,
            fields: event_fields("Plain"),
            recurrence: None,
        })
        .await
        .expect("event inserted");

    let (first, second) = tokio::join!(
        db.store.update_event(
            event.id,
            db.owner,
            overwrite(&db, bundle(json!({ "frequency": "DAILY" }))),
        ),
        db.store.update_event(
            event.id,
            db.owner,
            overwrite(&db, bundle(json!({ "frequency": "YEARLY" }))),
        ),
    );
    let first = first.expect("first update").expect("event exists");
    let second = second.expect("second update").expect("event exists");

    let first_id = first.recurrence.map(|r| r.id);
    assert!(first_id.is_some());
    assert_eq!(first_id, second.recurrence.map(|r| r.id));
    assert_eq!(db.orphan_rules().await, 0);

    let final_frequency = db
        .store
        .get_event(event.id, db.owner)
        .await
        .expect("read")
        .and_then(|e| e.recurrence)
        .map(|r| r.pattern.frequency);
    assert!(matches!(
        final_frequency,
        Some(Frequency::Daily | Frequency::Yearly)
    ));
}

#[test_log::test(tokio::test)]
async fn test_delete_removes_rule() {
    let Some(db) = TestDb::connect().await else {
        return;
    };
    let event = recurring_event(&db).await;
    let rule_id = event.recurrence.as_ref().map(|r| r.id).expect("rule linked");

    assert!(db.store.delete_event(event.id, db.owner).await.expect("deleted"));
    assert!(!db.rule_exists(rule_id).await);
    assert!(
        !db.store
            .delete_event(event.id, db.owner)
            .await
            .expect("second delete")
    );
}

#[test_log::test(tokio::test)]
async fn test_calendar_delete_cascades() {
    let Some(db) = TestDb::connect().await else {
        return;
    };
    let event = recurring_event(&db).await;
    let rule_id = event.recurrence.as_ref().map(|r| r.id).expect("rule linked");

    assert!(
        db.store
            .delete_calendar(db.calendar_id, db.owner)
            .await
            .expect("deleted")
    );

    assert!(!db.rule_exists(rule_id).await);
    assert!(
        db.store
            .get_event(event.id, db.owner)
            .await
            .expect("read")
            .is_none()
    );
    assert!(
        !db.store
            .delete_calendar(db.calendar_id, db.owner)
            .await
            .expect("idempotent")
    );
}
