//! Registration preconditions.
//!
//! Read-only checks performed before the admission engine is allowed to
//! touch the capacity counter. Checks run in a fixed order and
//! short-circuit on the first failure: user exists, event exists, no
//! ledger record for the pair, user not already on the waitlist.

use crate::error::ValidationError;
use crate::store::RegistryStore;
use crate::types::{Event, EventId, UserId};

/// Validates that `user_id` may attempt to register for `event_id`.
///
/// Returns a point-in-time copy of the event record for the admission
/// engine's initial branch decision. The copy may already be stale by the
/// time it is used; the admission engine must not trust its counters for
/// correctness, only the store's conditional predicates.
///
/// # Errors
///
/// The first failing check, in order: [`ValidationError::UserNotFound`],
/// [`ValidationError::EventNotFound`], [`ValidationError::AlreadyRegistered`],
/// [`ValidationError::AlreadyWaitlisted`]; or a passed-through store error.
pub async fn validate(
    store: &dyn RegistryStore,
    user_id: &UserId,
    event_id: &EventId,
) -> Result<Event, ValidationError> {
    if store.get_user(user_id).await?.is_none() {
        return Err(ValidationError::UserNotFound(user_id.clone()));
    }

    let Some(event) = store.get_event(event_id).await? else {
        return Err(ValidationError::EventNotFound(event_id.clone()));
    };

    if store.get_registration(user_id, event_id).await?.is_some() {
        return Err(ValidationError::AlreadyRegistered {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
        });
    }

    if event.waitlist.contains(user_id) {
        return Err(ValidationError::AlreadyWaitlisted {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
        });
    }

    Ok(event)
}
