//! Event management API endpoints.
//!
//! CRUD operations for events:
//! - POST /events - Create a new event
//! - GET /events - List events, optionally filtered by status
//! - GET /events/:event_id - Get event details
//! - PUT /events/:event_id - Update event attributes
//! - DELETE /events/:event_id - Delete an event

use super::{check_len, check_not_blank};
use crate::error::AppError;
use crate::server::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rsvp_core::types::{Event, EventId, EventPatch, EventStatus, NewEvent, UserId};
use rsvp_core::{Clock, RegistryStore};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a new event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Optional client-supplied event id; generated when absent.
    pub event_id: Option<String>,
    /// Event title (1-200 characters)
    pub title: String,
    /// Event description (up to 1000 characters)
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Where the event takes place (1-200 characters)
    pub location: String,
    /// Maximum number of confirmed registrations (> 0)
    pub capacity: u32,
    /// Who organizes the event (1-100 characters)
    pub organizer: String,
    /// Lifecycle status
    pub status: EventStatus,
    /// Whether overflow registrations queue on the waitlist
    #[serde(default)]
    pub waitlist_enabled: bool,
}

impl CreateEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(id) = &self.event_id {
            check_not_blank("eventId", id)?;
        }
        check_len("title", &self.title, 1, 200)?;
        check_len("description", &self.description, 0, 1000)?;
        check_len("location", &self.location, 1, 200)?;
        check_len("organizer", &self.organizer, 1, 100)?;
        if self.capacity == 0 {
            return Err(AppError::bad_request("capacity must be greater than zero"));
        }
        Ok(())
    }
}

/// Request to update an event. `null`/absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    /// Updated title
    pub title: Option<String>,
    /// Updated description
    pub description: Option<String>,
    /// Updated date
    pub date: Option<DateTime<Utc>>,
    /// Updated location
    pub location: Option<String>,
    /// Updated capacity
    pub capacity: Option<u32>,
    /// Updated organizer
    pub organizer: Option<String>,
    /// Updated status
    pub status: Option<EventStatus>,
}

impl UpdateEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            check_len("title", title, 1, 200)?;
        }
        if let Some(description) = &self.description {
            check_len("description", description, 0, 1000)?;
        }
        if let Some(location) = &self.location {
            check_len("location", location, 1, 200)?;
        }
        if let Some(organizer) = &self.organizer {
            check_len("organizer", organizer, 1, 100)?;
        }
        if self.capacity == Some(0) {
            return Err(AppError::bad_request("capacity must be greater than zero"));
        }
        Ok(())
    }

    fn into_patch(self) -> EventPatch {
        EventPatch {
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            capacity: self.capacity,
            organizer: self.organizer,
            status: self.status,
        }
    }
}

/// Event details response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event id
    pub event_id: EventId,
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Where the event takes place
    pub location: String,
    /// Maximum number of confirmed registrations
    pub capacity: u32,
    /// Who organizes the event
    pub organizer: String,
    /// Lifecycle status
    pub status: EventStatus,
    /// Number of confirmed registrations
    pub registered_count: u32,
    /// Whether overflow registrations queue on the waitlist
    pub waitlist_enabled: bool,
    /// FIFO queue of waiting user ids
    pub waitlist: Vec<UserId>,
    /// Remaining capacity slots (derived)
    pub available_spots: u32,
    /// Waitlist length (derived)
    pub waitlist_count: usize,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let available_spots = event.available_spots();
        let waitlist_count = event.waitlist_count();
        Self {
            event_id: event.event_id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            capacity: event.capacity,
            organizer: event.organizer,
            status: event.status,
            registered_count: event.registered_count,
            waitlist_enabled: event.waitlist_enabled,
            waitlist: event.waitlist,
            available_spots,
            waitlist_count,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Query parameters for listing events.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Only return events with this status.
    pub status: Option<EventStatus>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new event.
///
/// When the request carries an `event_id`, creation is conditional: an
/// existing event with that id is never overwritten (409). Without one, a
/// fresh UUID is generated.
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    request.validate()?;

    let event_id = request
        .event_id
        .as_deref()
        .map_or_else(EventId::generate, EventId::new);
    let attrs = NewEvent {
        title: request.title,
        description: request.description,
        date: request.date,
        location: request.location,
        capacity: request.capacity,
        organizer: request.organizer,
        status: request.status,
        waitlist_enabled: request.waitlist_enabled,
    };
    let event = Event::new(event_id, attrs, state.clock.now());

    state.store.create_event(event.clone()).await?;
    tracing::info!(event_id = %event.event_id, capacity = event.capacity, "event created");
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Get event details by id.
pub async fn get_event(
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event_id = EventId::new(event_id);
    let event = state
        .store
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::not_found("event", &event_id))?;
    Ok(Json(event.into()))
}

/// List events, optionally filtered by status.
pub async fn list_events(
    Query(query): Query<ListEventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state.store.list_events(query.status).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// Update an event's editable attributes.
///
/// The capacity counter and waitlist are not editable through this
/// endpoint; they only move through the admission and release protocols.
pub async fn update_event(
    Path(event_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    request.validate()?;
    let patch = request.into_patch();
    if patch.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }

    let event_id = EventId::new(event_id);
    let event = state
        .store
        .update_event(&event_id, patch, state.clock.now())
        .await?;
    Ok(Json(event.into()))
}

/// Delete an event.
pub async fn delete_event(
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let event_id = EventId::new(event_id);
    state.store.delete_event(&event_id).await?;
    tracing::info!(event_id = %event_id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}
