//! Router configuration for the rsvp server.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, service_info};
use super::state::AppState;
use crate::api::{events, registrations, users};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Service banner and health check
/// - Event CRUD
/// - User create/read
/// - Registration endpoints (user-centric and event-centric)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Banner and health
        .route("/", get(service_info))
        .route("/health", get(health_check))
        // Event management
        .route("/events", post(events::create_event))
        .route("/events", get(events::list_events))
        .route("/events/:event_id", get(events::get_event))
        .route("/events/:event_id", put(events::update_event))
        .route("/events/:event_id", delete(events::delete_event))
        // Event-centric registrations
        .route(
            "/events/:event_id/registrations",
            post(registrations::create_for_event),
        )
        .route(
            "/events/:event_id/registrations",
            get(registrations::list_for_event),
        )
        .route(
            "/events/:event_id/registrations/:user_id",
            delete(registrations::delete_for_event),
        )
        // Users
        .route("/users", post(users::create_user))
        .route("/users/:user_id", get(users::get_user))
        // User-centric registrations
        .route(
            "/users/:user_id/registrations",
            post(registrations::create_for_user),
        )
        .route(
            "/users/:user_id/registrations",
            get(registrations::list_for_user),
        )
        .route(
            "/users/:user_id/registrations/:event_id",
            delete(registrations::delete_for_user),
        )
        .with_state(state)
}
