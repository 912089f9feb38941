//! ## Summary
//! Storage seams for the service layer.
//!
//! Each trait covers one aggregate. Every mutating method is a single unit of
//! work: either all of its writes land or none do. Reads and writes are scoped
//! by owner; an entity owned by someone else is reported exactly like a missing
//! one.
//!
//! Two implementations exist: [`postgres::PgStore`] over the diesel pool and
//! [`memory::MemoryStore`] for tests and database-less runs.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use almanac_core::model::{
    Calendar, CalendarFields, Event, EventFields, RecurrenceBundle, RecurrencePattern, User,
};
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ServiceResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A user together with the stored password hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password_hash: String,
}

/// Fields for a new account. `email` is already normalized.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
}

/// A session to persist. Only the token hash is stored.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// A new event and, optionally, the rule to create and link with it.
#[derive(Debug, Clone)]
pub struct EventInsert {
    pub owner: Uuid,
    pub calendar_id: Uuid,
    pub fields: EventFields,
    pub recurrence: Option<RecurrencePattern>,
}

/// A full overwrite of an event plus the recurrence data sent with it. The
/// store plans the rule change against the event row it holds locked.
#[derive(Debug, Clone)]
pub struct EventUpdate {
    pub calendar_id: Uuid,
    pub fields: EventFields,
    pub recurrence: RecurrenceBundle,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account(&self, email: &str) -> ServiceResult<Option<Account>>;

    /// ## Errors
    /// Returns `Conflict` on `email` if the address is already registered.
    async fn insert_account(&self, account: NewAccount) -> ServiceResult<User>;

    async fn insert_session(&self, session: SessionGrant) -> ServiceResult<()>;

    /// Resolves the owner of an unexpired session.
    async fn session_user(
        &self,
        token_hash: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ServiceResult<Option<User>>;

    /// Removes a session. Unknown hashes are ignored.
    async fn delete_session(&self, token_hash: &str) -> ServiceResult<()>;
}

#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn list_calendars(&self, owner: Uuid) -> ServiceResult<Vec<Calendar>>;

    async fn get_calendar(&self, id: Uuid, owner: Uuid) -> ServiceResult<Option<Calendar>>;

    async fn insert_calendar(&self, owner: Uuid, fields: &CalendarFields)
    -> ServiceResult<Calendar>;

    async fn update_calendar(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &CalendarFields,
    ) -> ServiceResult<Option<Calendar>>;

    /// ## Summary
    /// Deletes a calendar with its events and their rules. Returns whether an
    /// owned calendar existed.
    async fn delete_calendar(&self, id: Uuid, owner: Uuid) -> ServiceResult<bool>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Owner's events, newest `start_time` first.
    async fn list_events(&self, owner: Uuid) -> ServiceResult<Vec<Event>>;

    async fn list_calendar_events(&self, calendar_id: Uuid, owner: Uuid)
    -> ServiceResult<Vec<Event>>;

    async fn get_event(&self, id: Uuid, owner: Uuid) -> ServiceResult<Option<Event>>;

    /// Writes the rule (if any) and the event atomically.
    async fn insert_event(&self, insert: EventInsert) -> ServiceResult<Event>;

    /// ## Summary
    /// Re-reads the event, plans its recurrence change from that state and
    /// applies it together with the overwrite atomically. Returns `None` if no
    /// owned event has that ID.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the merged or new rule is invalid and
    /// `NotFound` if the target calendar is missing or foreign.
    async fn update_event(
        &self,
        id: Uuid,
        owner: Uuid,
        update: EventUpdate,
    ) -> ServiceResult<Option<Event>>;

    /// ## Summary
    /// Deletes the event and its linked rule atomically. Returns whether an
    /// owned event existed.
    async fn delete_event(&self, id: Uuid, owner: Uuid) -> ServiceResult<bool>;
}

/// Everything the service layer needs from storage.
pub trait Store: AccountStore + CalendarStore + EventStore {}

impl<T: AccountStore + CalendarStore + EventStore> Store for T {}

pub type SharedStore = Arc<dyn Store>;
