//! Store contract for the registration service.
//!
//! This module defines the single logical store the engines run against: a
//! key-value collaborator holding events, users, and the registration
//! ledger, with two kinds of atomic primitives layered on top of plain CRUD:
//!
//! - **Conditional writes**: updates that only apply if a predicate on the
//!   *currently persisted* value holds, failing atomically otherwise
//!   (`reserve_slot`, the conditional creates).
//! - **Multi-key transactions**: all-or-nothing updates spanning the event
//!   record and a ledger record (`promote_head`).
//!
//! # Design
//!
//! The trait is deliberately minimal and purpose-shaped: it exposes exactly
//! the operations the admission and release protocols need, not a generic
//! query surface. Correctness of the whole system rests on implementations
//! evaluating the conditional predicates against current stored state at
//! the instant of the write, never against a caller-provided snapshot.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync`; any number of handlers may call
//! concurrently, including concurrent admissions and releases for the same
//! event. Each method must be atomic with respect to every other method.
//!
//! # Implementations
//!
//! - `MemoryStore` (in `rsvp-memory`): the in-process backend; one lock
//!   over the tables makes every call trivially atomic.

use crate::error::StoreError;
use crate::types::{Event, EventId, EventPatch, EventStatus, Registration, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The single logical store backing the registration service.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Conditionally creates a user; never overwrites.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the user id is taken; `Backend` on store failure.
    async fn create_user(&self, user: User) -> Result<(), StoreError>;

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// `Backend` on store failure.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError>;

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Conditionally creates an event; never overwrites an existing id.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the event id is taken; `Backend` on store failure.
    async fn create_event(&self, event: Event) -> Result<(), StoreError>;

    /// Fetches an event by id.
    ///
    /// # Errors
    ///
    /// `Backend` on store failure.
    async fn get_event(&self, event_id: &EventId) -> Result<Option<Event>, StoreError>;

    /// Applies a partial update to an event's editable attributes and
    /// returns the updated record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the event does not exist; `Backend` on store failure.
    async fn update_event(
        &self,
        event_id: &EventId,
        patch: EventPatch,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError>;

    /// Deletes an event.
    ///
    /// # Errors
    ///
    /// `NotFound` if the event does not exist; `Backend` on store failure.
    async fn delete_event(&self, event_id: &EventId) -> Result<(), StoreError>;

    /// Lists events, optionally filtered by status, ordered by event id.
    ///
    /// # Errors
    ///
    /// `Backend` on store failure.
    async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>, StoreError>;

    // ------------------------------------------------------------------
    // Registration ledger
    // ------------------------------------------------------------------

    /// Fetches the registration for a (user, event) pair.
    ///
    /// # Errors
    ///
    /// `Backend` on store failure.
    async fn get_registration(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Option<Registration>, StoreError>;

    /// Conditionally creates a ledger record; refuses to overwrite an
    /// existing record for the same (user, event) pair.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a record for the pair exists; `Backend` on store
    /// failure.
    async fn put_registration(&self, registration: Registration) -> Result<(), StoreError>;

    /// Deletes the registration for a (user, event) pair.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record exists for the pair; `Backend` on store
    /// failure.
    async fn delete_registration(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<(), StoreError>;

    /// All registrations held by a user.
    ///
    /// # Errors
    ///
    /// `Backend` on store failure.
    async fn registrations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Registration>, StoreError>;

    /// All registrations recorded against an event.
    ///
    /// # Errors
    ///
    /// `Backend` on store failure.
    async fn registrations_for_event(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<Registration>, StoreError>;

    // ------------------------------------------------------------------
    // Capacity primitives
    // ------------------------------------------------------------------

    /// Conditional increment of `registered_count`.
    ///
    /// The predicate `registered_count < capacity` is evaluated against the
    /// currently persisted record at the instant of the write. This is the
    /// sole serialization point preventing over-admission.
    ///
    /// # Errors
    ///
    /// `RaceLost` if the predicate fails (the event is full); `NotFound` if
    /// the event does not exist; `Backend` on store failure.
    async fn reserve_slot(
        &self,
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError>;

    /// Unconditional (saturating) decrement of `registered_count`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the event does not exist; `Backend` on store failure.
    async fn release_slot(
        &self,
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError>;

    /// Appends a user to the tail of the event's waitlist.
    ///
    /// Duplicate prevention is the validation layer's responsibility and is
    /// not re-checked here (list-append primitive).
    ///
    /// # Errors
    ///
    /// `NotFound` if the event does not exist; `Backend` on store failure.
    async fn push_waitlist(
        &self,
        event_id: &EventId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError>;

    /// Removes a user from the waitlist by exact match, preserving the
    /// order of the remaining entries. Succeeds as a no-op if the user is
    /// not present.
    ///
    /// # Errors
    ///
    /// `NotFound` if the event does not exist; `Backend` on store failure.
    async fn pull_waitlist(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError>;

    /// Atomically promotes the waitlist head: removes it from the waitlist,
    /// flips that user's ledger record from waitlist to confirmed, and
    /// re-increments `registered_count`, all or nothing.
    ///
    /// Preconditions, checked inside the transaction: the waitlist head
    /// still equals `expected_head`, the head's ledger record exists, and
    /// `registered_count < capacity`. Two releases racing to promote the
    /// same head therefore cannot both succeed.
    ///
    /// # Errors
    ///
    /// `TransactionConflict` if any precondition fails; `NotFound` if the
    /// event does not exist; `Backend` on store failure.
    async fn promote_head(
        &self,
        event_id: &EventId,
        expected_head: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError>;
}
