//! Admission engine: decides confirmed / waitlisted / rejected.
//!
//! The engine never trusts the snapshot it is handed; the snapshot only
//! picks the first branch to try. Correctness comes from the store's
//! conditional increment, whose predicate is evaluated against the
//! persisted record at write time. A lost race triggers a bounded retry
//! loop that re-fetches fresh event state (including the waitlist-enabled
//! flag) before deciding again.

use crate::clock::Clock;
use crate::error::{AdmissionError, StoreError};
use crate::store::RegistryStore;
use crate::types::{Event, EventId, UserId};
use std::sync::Arc;

/// Retry bound for the capacity race. Exceeding it signals a transient
/// failure rather than looping forever under pathological contention.
pub const DEFAULT_MAX_RETRIES: u32 = 8;

/// Outcome of an admission attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Admission {
    /// A capacity slot was reserved; carries the updated event record.
    Confirmed(Event),
    /// The event was full, the waitlist is enabled, and the user was
    /// appended to it; carries the updated event record.
    Waitlisted(Event),
    /// The event is full and the waitlist is disabled.
    Rejected,
}

/// Decides and applies the capacity side of a registration.
pub struct AdmissionEngine {
    store: Arc<dyn RegistryStore>,
    clock: Arc<dyn Clock>,
    max_retries: u32,
}

impl AdmissionEngine {
    /// Creates an engine with [`DEFAULT_MAX_RETRIES`].
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Overrides the retry bound.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Attempts to admit `user_id` to `event_id`.
    ///
    /// `snapshot` is the point-in-time copy returned by validation; its
    /// counters steer only the first iteration.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::RetriesExhausted`] after losing the capacity race
    /// on every attempt, [`AdmissionError::EventVanished`] if the event is
    /// deleted mid-flight, or a passed-through store failure.
    pub async fn admit(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        snapshot: Event,
    ) -> Result<Admission, AdmissionError> {
        let mut view = snapshot;

        for attempt in 1..=self.max_retries {
            if !view.is_full() {
                match self.store.reserve_slot(event_id, self.clock.now()).await {
                    Ok(updated) => return Ok(Admission::Confirmed(updated)),
                    Err(StoreError::RaceLost(_)) => {
                        // Another admission took the last slot between our
                        // read and the write. Re-fetch fresh state; the
                        // waitlist flag may have changed too.
                        tracing::debug!(
                            event_id = %event_id,
                            user_id = %user_id,
                            attempt,
                            "lost capacity race, re-reading event"
                        );
                        view = self
                            .store
                            .get_event(event_id)
                            .await?
                            .ok_or_else(|| AdmissionError::EventVanished(event_id.clone()))?;
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            if view.waitlist_enabled {
                let updated = self
                    .store
                    .push_waitlist(event_id, user_id.clone(), self.clock.now())
                    .await?;
                return Ok(Admission::Waitlisted(updated));
            }

            return Ok(Admission::Rejected);
        }

        Err(AdmissionError::RetriesExhausted {
            event_id: event_id.clone(),
            attempts: self.max_retries,
        })
    }
}
