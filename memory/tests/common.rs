//! Shared fixtures for the engine test suites.

#![allow(clippy::unwrap_used, dead_code)]

use chrono::Utc;
use rsvp_core::types::{Event, EventId, EventStatus, NewEvent, User, UserId};
use rsvp_core::{Registrar, RegistryStore, SystemClock};
use rsvp_memory::MemoryStore;
use std::sync::Arc;

/// A store plus a registrar wired over it.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub registrar: Arc<Registrar>,
}

/// Builds an empty store with a registrar over the system clock.
pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let registrar = Arc::new(Registrar::new(store.clone(), Arc::new(SystemClock)));
    Harness { store, registrar }
}

/// Creates an active event with the given capacity and waitlist flag.
pub async fn seed_event(
    store: &MemoryStore,
    id: &str,
    capacity: u32,
    waitlist_enabled: bool,
) -> EventId {
    let event = Event::new(
        EventId::new(id),
        NewEvent {
            title: format!("event {id}"),
            description: "integration fixture".to_string(),
            date: Utc::now(),
            location: "main hall".to_string(),
            capacity,
            organizer: "qa".to_string(),
            status: EventStatus::Active,
            waitlist_enabled,
        },
        Utc::now(),
    );
    let event_id = event.event_id.clone();
    store.create_event(event).await.unwrap();
    event_id
}

/// Creates a user with a synthetic name.
pub async fn seed_user(store: &MemoryStore, id: &str) -> UserId {
    let user_id = UserId::parse(id).unwrap();
    store
        .create_user(User::new(user_id.clone(), format!("user {id}"), Utc::now()))
        .await
        .unwrap();
    user_id
}

/// Creates `n` users named `u0..u{n-1}`.
pub async fn seed_users(store: &MemoryStore, n: usize) -> Vec<UserId> {
    let mut users = Vec::with_capacity(n);
    for i in 0..n {
        users.push(seed_user(store, &format!("u{i}")).await);
    }
    users
}
