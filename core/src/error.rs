//! Error taxonomy for the registration core.
//!
//! Store-level failures ([`StoreError`]) are separated from the
//! per-operation domain errors so callers can map each to the right
//! boundary behavior: not-found and conflict kinds become client errors,
//! backend failures become server errors, and lost races stay internal to
//! the admission engine's retry loop.

use crate::types::{EventId, UserId};
use thiserror::Error;

/// Errors surfaced by [`crate::store::RegistryStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional-update predicate evaluated false at execution time.
    ///
    /// For `reserve_slot` this means another caller took the last capacity
    /// slot between the caller's snapshot and the write.
    #[error("capacity predicate failed for event {0}")]
    RaceLost(EventId),

    /// A multi-key transaction precondition no longer held, so the whole
    /// transaction was aborted.
    #[error("transaction aborted: {0}")]
    TransactionConflict(String),

    /// A conditional create found an item already under the key.
    #[error("{kind} {id} already exists")]
    AlreadyExists {
        /// Item kind ("user", "event", "registration").
        kind: &'static str,
        /// The conflicting key.
        id: String,
    },

    /// An item the operation requires was not found.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Item kind ("user", "event", "registration").
        kind: &'static str,
        /// The missing key.
        id: String,
    },

    /// The backend itself failed (connectivity, corruption, poisoning).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Shorthand for a missing event.
    #[must_use]
    pub fn event_not_found(id: &EventId) -> Self {
        Self::NotFound {
            kind: "event",
            id: id.to_string(),
        }
    }
}

/// Precondition failures from the validation layer.
///
/// Checks run in this order and short-circuit on the first failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The event does not exist.
    #[error("event {0} not found")]
    EventNotFound(EventId),

    /// A ledger record already exists for this (user, event) pair.
    #[error("user {user_id} is already registered for event {event_id}")]
    AlreadyRegistered {
        /// The already-registered user.
        user_id: UserId,
        /// The event in question.
        event_id: EventId,
    },

    /// The user already sits on this event's waitlist.
    #[error("user {user_id} is already on the waitlist for event {event_id}")]
    AlreadyWaitlisted {
        /// The already-queued user.
        user_id: UserId,
        /// The event in question.
        event_id: EventId,
    },

    /// The store failed while checking preconditions.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the admission engine.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Every retry lost the capacity race; the caller should treat this as
    /// transient and may try again.
    #[error("admission for event {event_id} lost the capacity race {attempts} times")]
    RetriesExhausted {
        /// The contended event.
        event_id: EventId,
        /// How many attempts were made.
        attempts: u32,
    },

    /// The event disappeared mid-admission.
    #[error("event {0} not found")]
    EventVanished(EventId),

    /// The store failed outside the conditional predicate.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the full registration flow (validate, admit, ledger write).
#[derive(Debug, Error)]
pub enum RegisterError {
    /// A precondition failed before any state change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The admission engine failed.
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// The event is full and its waitlist is disabled.
    #[error("event {0} is full and the waitlist is not enabled")]
    CapacityExhausted(EventId),

    /// The ledger write failed after admission; any capacity reservation
    /// has already been compensated (best effort).
    #[error("failed to record registration: {0}")]
    Ledger(StoreError),
}

/// Failures of the release flow.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// No registration exists for the (user, event) pair.
    #[error("no registration for user {user_id} on event {event_id}")]
    RegistrationNotFound {
        /// The user attempting to unregister.
        user_id: UserId,
        /// The event in question.
        event_id: EventId,
    },

    /// The event no longer exists. The orphaned registration has already
    /// been deleted by the time this is returned.
    #[error("event {0} not found")]
    EventNotFound(EventId),

    /// The store failed mid-release.
    #[error(transparent)]
    Store(#[from] StoreError),
}
