//! ## Summary
//! In-process store backed by mutex-guarded maps.
//!
//! Every method takes the lock once and finishes all checks before the first
//! write, so a failed call leaves no partial state behind.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use almanac_core::model::{Calendar, CalendarFields, Event, RecurrenceRule, User};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    Account, AccountStore, CalendarStore, EventInsert, EventStore, EventUpdate, NewAccount,
    SessionGrant,
};
use crate::error::{ServiceError, ServiceResult};
use crate::event::recurrence::RecurrenceChange;

#[derive(Debug, Clone)]
struct StoredEvent {
    event: Event,
    recurrence_id: Option<Uuid>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    sessions: HashMap<String, SessionGrant>,
    calendars: HashMap<Uuid, Calendar>,
    events: HashMap<Uuid, StoredEvent>,
    rules: HashMap<Uuid, RecurrenceRule>,
}

impl State {
    fn assemble(&self, stored: &StoredEvent) -> Event {
        let mut event = stored.event.clone();
        event.recurrence = stored
            .recurrence_id
            .and_then(|id| self.rules.get(&id).cloned());
        event
    }

    fn owned_events(&self, owner: Uuid, calendar_id: Option<Uuid>) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .values()
            .filter(|s| s.event.user_id == owner)
            .filter(|s| calendar_id.is_none_or(|id| s.event.calendar_id == id))
            .map(|s| self.assemble(s))
            .collect();
        events.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(a.id.cmp(&b.id)));
        events
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored recurrence rules, linked or not.
    #[must_use]
    pub fn recurrence_rule_count(&self) -> usize {
        self.lock().rules.len()
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_account(&self, email: &str) -> ServiceResult<Option<Account>> {
        Ok(self
            .lock()
            .accounts
            .values()
            .find(|a| a.user.email == email)
            .cloned())
    }

    async fn insert_account(&self, account: NewAccount) -> ServiceResult<User> {
        let mut state = self.lock();
        if state.accounts.values().any(|a| a.user.email == account.email) {
            return Err(ServiceError::Conflict {
                field: "email",
                message: "A user with that email already exists.".to_string(),
            });
        }

        let user = User {
            id: Uuid::now_v7(),
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            phone_number: account.phone_number,
            created_at: Utc::now(),
        };
        state.accounts.insert(
            user.id,
            Account {
                user: user.clone(),
                password_hash: account.password_hash,
            },
        );
        Ok(user)
    }

    async fn insert_session(&self, session: SessionGrant) -> ServiceResult<()> {
        let mut state = self.lock();
        if !state.accounts.contains_key(&session.user_id) {
            return Err(ServiceError::InvariantViolation("session for unknown user"));
        }
        let now = Utc::now();
        state
            .sessions
            .retain(|_, s| s.user_id != session.user_id || s.expires_at > now);
        state.sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn session_user(
        &self,
        token_hash: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ServiceResult<Option<User>> {
        let state = self.lock();
        Ok(state
            .sessions
            .get(token_hash)
            .filter(|s| s.expires_at > now)
            .and_then(|s| state.accounts.get(&s.user_id))
            .map(|a| a.user.clone()))
    }

    async fn delete_session(&self, token_hash: &str) -> ServiceResult<()> {
        self.lock().sessions.remove(token_hash);
        Ok(())
    }
}

#[async_trait]
impl CalendarStore for MemoryStore {
    async fn list_calendars(&self, owner: Uuid) -> ServiceResult<Vec<Calendar>> {
        let mut calendars: Vec<Calendar> = self
            .lock()
            .calendars
            .values()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        calendars.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(calendars)
    }

    async fn get_calendar(&self, id: Uuid, owner: Uuid) -> ServiceResult<Option<Calendar>> {
        Ok(self
            .lock()
            .calendars
            .get(&id)
            .filter(|c| c.user_id == owner)
            .cloned())
    }

    async fn insert_calendar(
        &self,
        owner: Uuid,
        fields: &CalendarFields,
    ) -> ServiceResult<Calendar> {
        let now = Utc::now();
        let mut calendar = Calendar {
            id: Uuid::now_v7(),
            user_id: owner,
            name: String::new(),
            description: String::new(),
            color: String::new(),
            is_visible: true,
            created_at: now,
            updated_at: now,
        };
        calendar.assign(fields.clone());
        self.lock().calendars.insert(calendar.id, calendar.clone());
        Ok(calendar)
    }

    async fn update_calendar(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &CalendarFields,
    ) -> ServiceResult<Option<Calendar>> {
        let mut state = self.lock();
        let Some(calendar) = state.calendars.get_mut(&id).filter(|c| c.user_id == owner) else {
            return Ok(None);
        };
        calendar.assign(fields.clone());
        calendar.updated_at = Utc::now();
        Ok(Some(calendar.clone()))
    }

    async fn delete_calendar(&self, id: Uuid, owner: Uuid) -> ServiceResult<bool> {
        let mut state = self.lock();
        if !state.calendars.get(&id).is_some_and(|c| c.user_id == owner) {
            return Ok(false);
        }

        let doomed: Vec<Uuid> = state
            .events
            .values()
            .filter(|s| s.event.calendar_id == id && s.event.user_id == owner)
            .map(|s| s.event.id)
            .collect();
        for event_id in doomed {
            if let Some(stored) = state.events.remove(&event_id)
                && let Some(rule_id) = stored.recurrence_id
            {
                state.rules.remove(&rule_id);
            }
        }
        state.calendars.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self, owner: Uuid) -> ServiceResult<Vec<Event>> {
        Ok(self.lock().owned_events(owner, None))
    }

    async fn list_calendar_events(
        &self,
        calendar_id: Uuid,
        owner: Uuid,
    ) -> ServiceResult<Vec<Event>> {
        Ok(self.lock().owned_events(owner, Some(calendar_id)))
    }

    async fn get_event(&self, id: Uuid, owner: Uuid) -> ServiceResult<Option<Event>> {
        let state = self.lock();
        Ok(state
            .events
            .get(&id)
            .filter(|s| s.event.user_id == owner)
            .map(|s| state.assemble(s)))
    }

    async fn insert_event(&self, insert: EventInsert) -> ServiceResult<Event> {
        let mut state = self.lock();
        if !state
            .calendars
            .get(&insert.calendar_id)
            .is_some_and(|c| c.user_id == insert.owner)
        {
            return Err(ServiceError::calendar_not_found());
        }

        let rule = insert.recurrence.map(|pattern| RecurrenceRule {
            id: Uuid::now_v7(),
            pattern,
        });
        let now = Utc::now();
        let mut event = Event {
            id: Uuid::now_v7(),
            user_id: insert.owner,
            calendar_id: insert.calendar_id,
            title: String::new(),
            description: String::new(),
            start_time: insert.fields.start_time,
            end_time: insert.fields.end_time,
            color: None,
            is_all_day: false,
            recurrence: None,
            created_at: now,
            updated_at: now,
        };
        event.assign(insert.calendar_id, insert.fields);

        let recurrence_id = rule.as_ref().map(|r| r.id);
        if let Some(rule) = rule {
            state.rules.insert(rule.id, rule);
        }
        let stored = StoredEvent {
            event,
            recurrence_id,
        };
        let assembled = state.assemble(&stored);
        state.events.insert(stored.event.id, stored);
        Ok(assembled)
    }

    async fn update_event(
        &self,
        id: Uuid,
        owner: Uuid,
        update: EventUpdate,
    ) -> ServiceResult<Option<Event>> {
        let mut state = self.lock();
        let Some(current) = state.events.get(&id).filter(|s| s.event.user_id == owner) else {
            return Ok(None);
        };
        if !state
            .calendars
            .get(&update.calendar_id)
            .is_some_and(|c| c.user_id == owner)
        {
            return Err(ServiceError::calendar_not_found());
        }

        let mut stored = current.clone();
        let existing = state.assemble(current).recurrence;
        match RecurrenceChange::plan(existing.as_ref(), &update.recurrence)? {
            RecurrenceChange::Unchanged => {}
            RecurrenceChange::Attach(pattern) => {
                let rule = RecurrenceRule {
                    id: Uuid::now_v7(),
                    pattern,
                };
                stored.recurrence_id = Some(rule.id);
                state.rules.insert(rule.id, rule);
            }
            RecurrenceChange::Patch(rule) => {
                state.rules.insert(rule.id, rule);
            }
            RecurrenceChange::Detach(rule_id) => {
                stored.recurrence_id = None;
                state.rules.remove(&rule_id);
            }
        }

        stored.event.assign(update.calendar_id, update.fields);
        stored.event.updated_at = Utc::now();
        let assembled = state.assemble(&stored);
        state.events.insert(id, stored);
        Ok(Some(assembled))
    }

    async fn delete_event(&self, id: Uuid, owner: Uuid) -> ServiceResult<bool> {
        let mut state = self.lock();
        if !state.events.get(&id).is_some_and(|s| s.event.user_id == owner) {
            return Ok(false);
        }
        if let Some(stored) = state.events.remove(&id)
            && let Some(rule_id) = stored.recurrence_id
        {
            state.rules.remove(&rule_id);
        }
        Ok(true)
    }
}
