//! ## Summary
//! `PostgreSQL` store over the diesel-async pool.
//!
//! Mutations run inside `AsyncConnection::transaction`; any error returned from
//! the closure rolls the whole unit back.

use almanac_core::model::{Calendar, CalendarFields, Event, RecurrenceRule, User};
use almanac_db::db::DbProvider;
use almanac_db::db::connection::DbPool;
use almanac_db::db::query::{calendar, event, recurrence, session, user};
use almanac_db::error::DbError;
use almanac_db::model::calendar::{CalendarChangeset, NewCalendar};
use almanac_db::model::event::{EventChangeset, NewEvent};
use almanac_db::model::recurrence::{NewRecurrenceRule, RecurrenceRuleChangeset};
use almanac_db::model::session::NewSession;
use almanac_db::model::user::NewUser;
use async_trait::async_trait;
use chrono::Utc;
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use super::{
    Account, AccountStore, CalendarStore, EventInsert, EventStore, EventUpdate, NewAccount,
    SessionGrant,
};
use crate::error::{ServiceError, ServiceResult};
use crate::event::recurrence::RecurrenceChange;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn find_account(&self, email: &str) -> ServiceResult<Option<Account>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(user::find_by_email(&mut conn, email)
            .await?
            .map(|record| Account {
                password_hash: record.password_hash.clone(),
                user: record.into(),
            }))
    }

    #[tracing::instrument(skip(self, account), fields(email = %account.email))]
    async fn insert_account(&self, account: NewAccount) -> ServiceResult<User> {
        let mut conn = self.pool.get_connection().await?;
        let new_user = NewUser {
            id: Uuid::now_v7(),
            email: &account.email,
            first_name: &account.first_name,
            last_name: &account.last_name,
            phone_number: account.phone_number.as_deref(),
            password_hash: &account.password_hash,
        };

        match user::insert(&mut conn, &new_user).await {
            Ok(record) => Ok(record.into()),
            Err(e) => {
                let err = DbError::from(e);
                if err.is_unique_violation() {
                    Err(ServiceError::Conflict {
                        field: "email",
                        message: "A user with that email already exists.".to_string(),
                    })
                } else {
                    Err(err.into())
                }
            }
        }
    }

    #[tracing::instrument(skip(self, grant), fields(user_id = %grant.user_id))]
    async fn insert_session(&self, grant: SessionGrant) -> ServiceResult<()> {
        let mut conn = self.pool.get_connection().await?;
        let now = Utc::now();
        conn.transaction::<_, ServiceError, _>(|tx| {
            async move {
                session::delete_expired_for_user(tx, grant.user_id, now).await?;
                session::insert(
                    tx,
                    &NewSession {
                        id: Uuid::now_v7(),
                        user_id: grant.user_id,
                        token_hash: &grant.token_hash,
                        expires_at: grant.expires_at,
                    },
                )
                .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    #[tracing::instrument(skip_all)]
    async fn session_user(
        &self,
        token_hash: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ServiceResult<Option<User>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(session::user_for_token(&mut conn, token_hash, now)
            .await?
            .map(Into::into))
    }

    #[tracing::instrument(skip_all)]
    async fn delete_session(&self, token_hash: &str) -> ServiceResult<()> {
        let mut conn = self.pool.get_connection().await?;
        let _removed = session::delete_by_token(&mut conn, token_hash).await?;
        Ok(())
    }
}

#[async_trait]
impl CalendarStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn list_calendars(&self, owner: Uuid) -> ServiceResult<Vec<Calendar>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(calendar::list(&mut conn, owner)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_calendar(&self, id: Uuid, owner: Uuid) -> ServiceResult<Option<Calendar>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(calendar::find(&mut conn, id, owner).await?.map(Into::into))
    }

    #[tracing::instrument(skip(self, fields))]
    async fn insert_calendar(
        &self,
        owner: Uuid,
        fields: &CalendarFields,
    ) -> ServiceResult<Calendar> {
        let mut conn = self.pool.get_connection().await?;
        let new = NewCalendar::from_fields(Uuid::now_v7(), owner, fields);
        Ok(calendar::insert(&mut conn, &new).await?.into())
    }

    #[tracing::instrument(skip(self, fields))]
    async fn update_calendar(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &CalendarFields,
    ) -> ServiceResult<Option<Calendar>> {
        let mut conn = self.pool.get_connection().await?;
        let changes = CalendarChangeset::from_fields(fields, Utc::now());
        Ok(calendar::update(&mut conn, id, owner, &changes)
            .await?
            .map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_calendar(&self, id: Uuid, owner: Uuid) -> ServiceResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        conn.transaction::<_, ServiceError, _>(|tx| {
            async move {
                if calendar::find(tx, id, owner).await?.is_none() {
                    return Ok(false);
                }
                let rule_ids = event::delete_in_calendar(tx, id, owner).await?;
                let rules = recurrence::delete_many(tx, &rule_ids).await?;
                let removed = calendar::delete(tx, id, owner).await?;
                tracing::debug!(rules, removed, "Calendar deleted with its events");
                Ok(removed > 0)
            }
            .scope_boxed()
        })
        .await
    }
}

#[async_trait]
impl EventStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn list_events(&self, owner: Uuid) -> ServiceResult<Vec<Event>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(event::list(&mut conn, owner).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_calendar_events(
        &self,
        calendar_id: Uuid,
        owner: Uuid,
    ) -> ServiceResult<Vec<Event>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(event::list_in_calendar(&mut conn, calendar_id, owner).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_event(&self, id: Uuid, owner: Uuid) -> ServiceResult<Option<Event>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(event::find(&mut conn, id, owner).await?)
    }

    #[tracing::instrument(skip(self, insert), fields(owner = %insert.owner, calendar_id = %insert.calendar_id))]
    async fn insert_event(&self, insert: EventInsert) -> ServiceResult<Event> {
        let mut conn = self.pool.get_connection().await?;
        conn.transaction::<_, ServiceError, _>(|tx| {
            async move {
                if calendar::find(tx, insert.calendar_id, insert.owner)
                    .await?
                    .is_none()
                {
                    return Err(ServiceError::calendar_not_found());
                }

                let rule = insert.recurrence.map(|pattern| RecurrenceRule {
                    id: Uuid::now_v7(),
                    pattern,
                });
                if let Some(rule) = &rule {
                    recurrence::insert(tx, &NewRecurrenceRule::from_rule(rule)).await?;
                }

                let new = NewEvent::new(
                    Uuid::now_v7(),
                    insert.owner,
                    insert.calendar_id,
                    rule.as_ref().map(|r| r.id),
                    &insert.fields,
                );
                let record = event::insert(tx, &new).await?;
                Ok(record.into_event(rule))
            }
            .scope_boxed()
        })
        .await
    }

    #[tracing::instrument(skip(self, update), fields(calendar_id = %update.calendar_id))]
    async fn update_event(
        &self,
        id: Uuid,
        owner: Uuid,
        update: EventUpdate,
    ) -> ServiceResult<Option<Event>> {
        let mut conn = self.pool.get_connection().await?;
        conn.transaction::<_, ServiceError, _>(|tx| {
            async move {
                let Some(current) = event::find_locked(tx, id, owner).await? else {
                    return Ok(None);
                };
                if calendar::find(tx, update.calendar_id, owner)
                    .await?
                    .is_none()
                {
                    return Err(ServiceError::calendar_not_found());
                }

                let now = Utc::now();
                let mut detached = None;
                let rule = match RecurrenceChange::plan(
                    current.recurrence.as_ref(),
                    &update.recurrence,
                )? {
                    RecurrenceChange::Unchanged => None,
                    RecurrenceChange::Attach(pattern) => {
                        let rule = RecurrenceRule {
                            id: Uuid::now_v7(),
                            pattern,
                        };
                        recurrence::insert(tx, &NewRecurrenceRule::from_rule(&rule)).await?;
                        Some(rule)
                    }
                    RecurrenceChange::Patch(rule) => {
                        let changes = RecurrenceRuleChangeset::from_pattern(&rule.pattern, now);
                        recurrence::update(tx, rule.id, &changes).await?;
                        Some(rule)
                    }
                    RecurrenceChange::Detach(rule_id) => {
                        detached = Some(rule_id);
                        None
                    }
                };

                let changes = EventChangeset::new(
                    update.calendar_id,
                    rule.as_ref().map(|r| r.id),
                    &update.fields,
                    now,
                );
                let record = event::update(tx, id, &changes).await?;

                // The link is gone now, so the rule row can be removed.
                if let Some(rule_id) = detached {
                    recurrence::delete_many(tx, &[rule_id]).await?;
                }

                Ok(Some(record.into_event(rule)))
            }
            .scope_boxed()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_event(&self, id: Uuid, owner: Uuid) -> ServiceResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        conn.transaction::<_, ServiceError, _>(|tx| {
            async move {
                let Some(linked) = event::delete(tx, id, owner).await? else {
                    return Ok(false);
                };
                if let Some(rule_id) = linked {
                    recurrence::delete_many(tx, &[rule_id]).await?;
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
    }
}
