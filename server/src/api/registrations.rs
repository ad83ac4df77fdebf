//! Registration API endpoints (user-centric and event-centric variants).
//!
//! - POST /users/:user_id/registrations - Register a user for an event
//! - GET /users/:user_id/registrations - List a user's registrations
//! - DELETE /users/:user_id/registrations/:event_id - Unregister
//! - POST /events/:event_id/registrations - Register (event-centric)
//! - GET /events/:event_id/registrations - List an event's registrations
//! - DELETE /events/:event_id/registrations/:user_id - Unregister
//!
//! Both POST variants funnel into the same registrar flow: validate,
//! admit against the capacity counter, write the ledger record.

use crate::error::AppError;
use crate::server::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rsvp_core::types::{EventId, Registration, RegistrationStatus, UserId};
use rsvp_core::RegistryStore;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body for the user-centric registration endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForEventRequest {
    /// The event to register for.
    pub event_id: String,
}

/// Body for the event-centric registration endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    /// The user to register.
    pub user_id: String,
}

/// A single registration in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    /// The registered user
    pub user_id: UserId,
    /// The event registered for
    pub event_id: EventId,
    /// Confirmed slot or waitlist membership
    pub status: RegistrationStatus,
    /// When the registration was created
    pub registered_at: DateTime<Utc>,
    /// Event title captured at registration time
    pub event_title: String,
    /// Event date captured at registration time
    pub event_date: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            user_id: registration.user_id,
            event_id: registration.event_id,
            status: registration.status,
            registered_at: registration.registered_at,
            event_title: registration.event_title,
            event_date: registration.event_date,
        }
    }
}

/// Registration listing with a total count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationListResponse {
    /// The registrations found.
    pub registrations: Vec<RegistrationResponse>,
    /// Total number of registrations.
    pub total: usize,
}

impl RegistrationListResponse {
    fn new(registrations: Vec<Registration>) -> Self {
        let registrations: Vec<RegistrationResponse> = registrations
            .into_iter()
            .map(RegistrationResponse::from)
            .collect();
        Self {
            total: registrations.len(),
            registrations,
        }
    }
}

fn parse_user_id(raw: String) -> Result<UserId, AppError> {
    UserId::parse(raw).map_err(|err| AppError::bad_request(err.to_string()))
}

// ============================================================================
// Handlers (user-centric)
// ============================================================================

/// Register a user for an event.
pub async fn create_for_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<RegisterForEventRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let user_id = parse_user_id(user_id)?;
    let event_id = EventId::new(request.event_id);
    let registration = state.registrar.register(&user_id, &event_id).await?;
    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// List all registrations held by a user.
pub async fn list_for_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RegistrationListResponse>, AppError> {
    let user_id = parse_user_id(user_id)?;
    if state.store.get_user(&user_id).await?.is_none() {
        return Err(AppError::not_found("user", &user_id));
    }
    let registrations = state.store.registrations_for_user(&user_id).await?;
    Ok(Json(RegistrationListResponse::new(registrations)))
}

/// Unregister a user from an event, promoting the waitlist head if a
/// confirmed slot was freed.
pub async fn delete_for_user(
    Path((user_id, event_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let user_id = parse_user_id(user_id)?;
    let event_id = EventId::new(event_id);
    state.registrar.unregister(&user_id, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Handlers (event-centric)
// ============================================================================

/// Register a user for an event (event-centric variant).
pub async fn create_for_event(
    Path(event_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let user_id = parse_user_id(request.user_id)?;
    let event_id = EventId::new(event_id);
    let registration = state.registrar.register(&user_id, &event_id).await?;
    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// List all registrations recorded against an event.
pub async fn list_for_event(
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RegistrationListResponse>, AppError> {
    let event_id = EventId::new(event_id);
    if state.store.get_event(&event_id).await?.is_none() {
        return Err(AppError::not_found("event", &event_id));
    }
    let registrations = state.store.registrations_for_event(&event_id).await?;
    Ok(Json(RegistrationListResponse::new(registrations)))
}

/// Unregister a user from an event (event-centric variant).
pub async fn delete_for_event(
    Path((event_id, user_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let user_id = parse_user_id(user_id)?;
    let event_id = EventId::new(event_id);
    state.registrar.unregister(&user_id, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
