//! # rsvp core
//!
//! Domain model and engines for an event-registration service with bounded
//! capacity and an overflow waitlist.
//!
//! ## Architecture
//!
//! ```text
//! register request                      unregister request
//!       │                                      │
//!       ▼                                      ▼
//! ┌─────────────┐                       ┌──────────────┐
//! │ validation  │  read-only checks     │   release    │
//! └─────┬───────┘                       │  & promote   │
//!       ▼                               └──────┬───────┘
//! ┌─────────────┐   conditional write          │  multi-key txn
//! │  admission  │──────────────┐               │
//! └─────┬───────┘              ▼               ▼
//!       │               ┌──────────────────────────┐
//!       ▼               │      RegistryStore       │
//!  ledger write ───────▶│  (conditional writes +   │
//!  (+ rollback)         │   atomic transactions)   │
//!                       └──────────────────────────┘
//! ```
//!
//! All shared mutable state lives behind the [`store::RegistryStore`]
//! trait; handlers are stateless and any number may run concurrently. The
//! store's conditional increment of the capacity counter is the single
//! serialization point that prevents over-admission, and the promotion
//! transaction's preconditions make waitlist promotion exactly-once.
//!
//! The in-memory backend lives in the `rsvp-memory` crate; the HTTP
//! surface in `rsvp-server`.

pub mod admission;
pub mod clock;
pub mod error;
pub mod registrar;
pub mod release;
pub mod store;
pub mod types;
pub mod validation;

pub use admission::{Admission, AdmissionEngine, DEFAULT_MAX_RETRIES};
pub use clock::{Clock, SystemClock};
pub use error::{AdmissionError, RegisterError, ReleaseError, StoreError, ValidationError};
pub use registrar::Registrar;
pub use release::ReleaseEngine;
pub use store::RegistryStore;
pub use types::{
    Event, EventId, EventPatch, EventStatus, NewEvent, Registration, RegistrationStatus, User,
    UserId,
};
