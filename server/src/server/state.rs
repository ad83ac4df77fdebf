//! Application state for the rsvp HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers. Handlers
//! themselves are stateless; everything mutable lives behind the store.

use rsvp_core::{Clock, Registrar, RegistryStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// The single logical store (capacity records, users, ledger).
    pub store: Arc<dyn RegistryStore>,

    /// Orchestrates the admission and release protocols.
    pub registrar: Arc<Registrar>,

    /// Time source for record timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<dyn RegistryStore>,
        registrar: Arc<Registrar>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registrar,
            clock,
        }
    }
}
