//! In-memory `RegistryStore` backend.
//!
//! Three tables behind one `RwLock`. Every trait method takes the write
//! lock for its whole body, which makes each call atomic with respect to
//! every other call, which is exactly the conditional-write and multi-key
//! transaction contract `rsvp-core` requires. No await point ever sits
//! inside the critical section, so the lock is held only for in-memory
//! mutation.
//!
//! This is the backend used by the server binary and by the engine test
//! suites. A remote store (anything offering conditional writes and small
//! multi-key transactions) can replace it by implementing the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rsvp_core::error::StoreError;
use rsvp_core::store::RegistryStore;
use rsvp_core::types::{Event, EventId, EventPatch, EventStatus, Registration, User, UserId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The three tables of the logical store.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    /// Ledger keyed by (user, event); the `BTreeMap` keeps per-user scans
    /// ordered and deterministic.
    registrations: BTreeMap<(UserId, EventId), Registration>,
}

/// In-memory store implementing [`RegistryStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

fn event_mut<'t>(tables: &'t mut Tables, event_id: &EventId) -> Result<&'t mut Event, StoreError> {
    tables
        .events
        .get_mut(event_id)
        .ok_or_else(|| StoreError::event_not_found(event_id))
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.users.contains_key(&user.user_id) {
            return Err(StoreError::AlreadyExists {
                kind: "user",
                id: user.user_id.to_string(),
            });
        }
        tables.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    async fn create_event(&self, event: Event) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.events.contains_key(&event.event_id) {
            return Err(StoreError::AlreadyExists {
                kind: "event",
                id: event.event_id.to_string(),
            });
        }
        tables.events.insert(event.event_id.clone(), event);
        Ok(())
    }

    async fn get_event(&self, event_id: &EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.read()?.events.get(event_id).cloned())
    }

    async fn update_event(
        &self,
        event_id: &EventId,
        patch: EventPatch,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut tables = self.write()?;
        let event = event_mut(&mut tables, event_id)?;
        patch.apply(event, now);
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: &EventId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .events
            .remove(event_id)
            .map(drop)
            .ok_or_else(|| StoreError::event_not_found(event_id))
    }

    async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>, StoreError> {
        let tables = self.read()?;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.event_id.cmp(&b.event_id));
        Ok(events)
    }

    async fn get_registration(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .read()?
            .registrations
            .get(&(user_id.clone(), event_id.clone()))
            .cloned())
    }

    async fn put_registration(&self, registration: Registration) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let key = (
            registration.user_id.clone(),
            registration.event_id.clone(),
        );
        if tables.registrations.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: "registration",
                id: format!("{}/{}", key.0, key.1),
            });
        }
        tables.registrations.insert(key, registration);
        Ok(())
    }

    async fn delete_registration(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .registrations
            .remove(&(user_id.clone(), event_id.clone()))
            .map(drop)
            .ok_or_else(|| StoreError::NotFound {
                kind: "registration",
                id: format!("{user_id}/{event_id}"),
            })
    }

    async fn registrations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Registration>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .registrations
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn registrations_for_event(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<Registration>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .registrations
            .values()
            .filter(|r| &r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn reserve_slot(
        &self,
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut tables = self.write()?;
        let event = event_mut(&mut tables, event_id)?;
        // The predicate runs here, under the lock, against the persisted
        // record, not against whatever snapshot the caller holds.
        if event.registered_count >= event.capacity {
            return Err(StoreError::RaceLost(event_id.clone()));
        }
        event.registered_count += 1;
        event.updated_at = now;
        Ok(event.clone())
    }

    async fn release_slot(
        &self,
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut tables = self.write()?;
        let event = event_mut(&mut tables, event_id)?;
        event.registered_count = event.registered_count.saturating_sub(1);
        event.updated_at = now;
        Ok(event.clone())
    }

    async fn push_waitlist(
        &self,
        event_id: &EventId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut tables = self.write()?;
        let event = event_mut(&mut tables, event_id)?;
        event.waitlist.push(user_id);
        event.updated_at = now;
        Ok(event.clone())
    }

    async fn pull_waitlist(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut tables = self.write()?;
        let event = event_mut(&mut tables, event_id)?;
        if let Some(pos) = event.waitlist.iter().position(|u| u == user_id) {
            event.waitlist.remove(pos);
            event.updated_at = now;
        }
        Ok(event.clone())
    }

    async fn promote_head(
        &self,
        event_id: &EventId,
        expected_head: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut tables = self.write()?;

        // Check every precondition before mutating anything so the
        // transaction is all-or-nothing.
        let event = tables
            .events
            .get(event_id)
            .ok_or_else(|| StoreError::event_not_found(event_id))?;
        if event.waitlist.first() != Some(expected_head) {
            return Err(StoreError::TransactionConflict(format!(
                "waitlist head of event {event_id} is no longer {expected_head}"
            )));
        }
        if event.registered_count >= event.capacity {
            return Err(StoreError::TransactionConflict(format!(
                "no free slot on event {event_id} to promote into"
            )));
        }
        let key = (expected_head.clone(), event_id.clone());
        if !tables.registrations.contains_key(&key) {
            return Err(StoreError::TransactionConflict(format!(
                "no ledger record for waitlist head {expected_head} on event {event_id}"
            )));
        }

        if let Some(registration) = tables.registrations.get_mut(&key) {
            registration.status = rsvp_core::types::RegistrationStatus::Confirmed;
        }
        let event = event_mut(&mut tables, event_id)?;
        event.waitlist.remove(0);
        event.registered_count += 1;
        event.updated_at = now;
        Ok(event.clone())
    }
}
