//! rsvp HTTP server library.
//!
//! Thin imperative shell over `rsvp-core`: Axum handlers parse and
//! validate request shapes, delegate to the store and the registrar, and
//! map the core error taxonomy onto status codes. All registration
//! decisions happen in the core engines; the handlers hold no state of
//! their own.

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::AppError;
pub use server::{build_router, AppState};
