//! Registration orchestration.
//!
//! The `Registrar` composes the validation layer, the admission engine, and
//! the release engine into the two flows the API exposes. The ledger write
//! happens *after* admission and is not atomic with it; a failed ledger
//! write triggers a best-effort compensating rollback of the capacity
//! change, and a failed compensation is logged rather than escalated (a
//! rare, bounded counter drift is accepted over failing the request twice).

use crate::admission::{Admission, AdmissionEngine};
use crate::clock::Clock;
use crate::error::RegisterError;
use crate::release::ReleaseEngine;
use crate::store::RegistryStore;
use crate::types::{EventId, Registration, RegistrationStatus, UserId};
use crate::validation;
use std::sync::Arc;

/// Entry point for registering and unregistering users.
pub struct Registrar {
    store: Arc<dyn RegistryStore>,
    clock: Arc<dyn Clock>,
    admission: AdmissionEngine,
    release: ReleaseEngine,
}

impl Registrar {
    /// Wires the engines over a shared store and clock.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            admission: AdmissionEngine::new(store.clone(), clock.clone()),
            release: ReleaseEngine::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    /// Registers `user_id` for `event_id`.
    ///
    /// Flow: validate preconditions → admit against the capacity counter →
    /// write the ledger record (stamped with the pre-admission snapshot's
    /// title and date). If the ledger write fails, the capacity change is
    /// rolled back best-effort before the error is returned.
    ///
    /// # Errors
    ///
    /// [`RegisterError::Validation`] for precondition failures,
    /// [`RegisterError::CapacityExhausted`] when the event is full without
    /// a waitlist, [`RegisterError::Admission`] for exhausted retries or
    /// store failures, [`RegisterError::Ledger`] when the ledger write
    /// fails (including a duplicate record created by a racing request).
    pub async fn register(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Registration, RegisterError> {
        let snapshot = validation::validate(self.store.as_ref(), user_id, event_id).await?;

        let admission = self.admission.admit(event_id, user_id, snapshot.clone()).await?;
        let status = match admission {
            Admission::Confirmed(_) => RegistrationStatus::Confirmed,
            Admission::Waitlisted(_) => RegistrationStatus::Waitlist,
            Admission::Rejected => {
                return Err(RegisterError::CapacityExhausted(event_id.clone()));
            }
        };

        let registration = Registration {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            status,
            registered_at: self.clock.now(),
            event_title: snapshot.title,
            event_date: snapshot.date,
        };

        if let Err(err) = self.store.put_registration(registration.clone()).await {
            self.compensate(event_id, user_id, status).await;
            return Err(RegisterError::Ledger(err));
        }

        tracing::info!(
            user_id = %user_id,
            event_id = %event_id,
            status = %status,
            "registration recorded"
        );
        Ok(registration)
    }

    /// Unregisters `user_id` from `event_id`, promoting the waitlist head
    /// if a confirmed slot was freed.
    ///
    /// # Errors
    ///
    /// See [`ReleaseEngine::release`].
    pub async fn unregister(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<(), crate::error::ReleaseError> {
        self.release.release(user_id, event_id).await
    }

    /// Undoes the capacity side of an admission whose ledger write failed.
    /// Failure here is swallowed: no stronger recovery primitive exists,
    /// and the accepted worst case is a counter drifting high by one.
    async fn compensate(&self, event_id: &EventId, user_id: &UserId, status: RegistrationStatus) {
        let now = self.clock.now();
        let outcome = match status {
            RegistrationStatus::Confirmed => {
                self.store.release_slot(event_id, now).await.map(drop)
            }
            RegistrationStatus::Waitlist => self
                .store
                .pull_waitlist(event_id, user_id, now)
                .await
                .map(drop),
        };
        match outcome {
            Ok(()) => {
                tracing::warn!(
                    user_id = %user_id,
                    event_id = %event_id,
                    status = %status,
                    "ledger write failed, capacity change rolled back"
                );
            }
            Err(err) => {
                tracing::error!(
                    user_id = %user_id,
                    event_id = %event_id,
                    status = %status,
                    error = %err,
                    "compensating rollback failed, counter may drift by one"
                );
            }
        }
    }
}
