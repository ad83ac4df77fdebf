//! Release engine: frees a slot and promotes the waitlist head.
//!
//! Releasing a confirmed registration decrements the counter and then, if
//! anyone is waiting, runs the promotion transaction. The transaction's
//! preconditions (head unchanged, ledger record present, capacity free)
//! make a promotion exactly-once: two releases racing over the same head
//! cannot both succeed. A failed promotion is logged and swallowed: the
//! caller's own unregistration has already taken effect, and the stale
//! head will be retried by the next release cycle.

use crate::clock::Clock;
use crate::error::{ReleaseError, StoreError};
use crate::store::RegistryStore;
use crate::types::{EventId, RegistrationStatus, UserId};
use std::sync::Arc;

/// Removes registrations and performs waitlist promotion.
pub struct ReleaseEngine {
    store: Arc<dyn RegistryStore>,
    clock: Arc<dyn Clock>,
}

impl ReleaseEngine {
    /// Creates a release engine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Releases the registration of `user_id` on `event_id`.
    ///
    /// # Errors
    ///
    /// [`ReleaseError::RegistrationNotFound`] if no record exists (or a
    /// concurrent release already deleted it);
    /// [`ReleaseError::EventNotFound`] if the event is gone (the orphaned
    /// registration is still deleted first; or a passed-through store
    /// failure.
    pub async fn release(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<(), ReleaseError> {
        let Some(registration) = self.store.get_registration(user_id, event_id).await? else {
            return Err(ReleaseError::RegistrationNotFound {
                user_id: user_id.clone(),
                event_id: event_id.clone(),
            });
        };

        if self.store.get_event(event_id).await?.is_none() {
            // Orphaned ledger record: the event vanished underneath it.
            // Delete the record anyway, then report the anomaly.
            tracing::warn!(
                user_id = %user_id,
                event_id = %event_id,
                "deleting registration for a missing event"
            );
            self.delete_exactly_once(user_id, event_id).await?;
            return Err(ReleaseError::EventNotFound(event_id.clone()));
        }

        // The delete is the linearization point for this release: of two
        // concurrent releases of the same registration, only the one whose
        // delete succeeds continues into the capacity bookkeeping.
        self.delete_exactly_once(user_id, event_id).await?;

        let now = self.clock.now();
        match registration.status {
            RegistrationStatus::Confirmed => {
                let updated = self.store.release_slot(event_id, now).await?;
                if let Some(head) = updated.waitlist.first().cloned() {
                    match self.store.promote_head(event_id, &head, self.clock.now()).await {
                        Ok(_) => {
                            tracing::info!(
                                event_id = %event_id,
                                promoted = %head,
                                "promoted waitlist head to confirmed"
                            );
                        }
                        Err(err) => {
                            // Best effort: the slot stays open and the head
                            // stays queued for the next release cycle.
                            tracing::warn!(
                                event_id = %event_id,
                                head = %head,
                                error = %err,
                                "waitlist promotion failed"
                            );
                        }
                    }
                }
            }
            RegistrationStatus::Waitlist => {
                if let Err(err) = self.store.pull_waitlist(event_id, user_id, now).await {
                    // The unregistration itself already succeeded.
                    tracing::warn!(
                        event_id = %event_id,
                        user_id = %user_id,
                        error = %err,
                        "failed to remove released user from waitlist"
                    );
                }
            }
        }

        Ok(())
    }

    /// Deletes the ledger record, mapping a lost delete race to
    /// `RegistrationNotFound` so the loser performs no bookkeeping.
    async fn delete_exactly_once(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<(), ReleaseError> {
        match self.store.delete_registration(user_id, event_id).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(ReleaseError::RegistrationNotFound {
                user_id: user_id.clone(),
                event_id: event_id.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}
