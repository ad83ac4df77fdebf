//! Domain types for the registration service.
//!
//! Value objects (ids, statuses) and the three persisted records: events,
//! users, and registrations. The event record is the single source of truth
//! for capacity accounting; registrations are a derived per-user view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Maximum length accepted for a user id.
pub const MAX_USER_ID_LEN: usize = 100;

/// Unique identifier for an event.
///
/// Opaque string: either supplied by the client at creation time or
/// generated as a UUID v4.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates an `EventId` from a client-supplied string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random `EventId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user.
///
/// Client-supplied, restricted to `[a-zA-Z0-9_-]+`, 1 to [`MAX_USER_ID_LEN`]
/// characters. Construct via [`UserId::parse`] so an invalid id can never
/// enter the system.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parses and validates a user id.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUserId`] if the id is empty, longer than
    /// [`MAX_USER_ID_LEN`], or contains characters outside `[a-zA-Z0-9_-]`.
    pub fn parse(id: impl Into<String>) -> Result<Self, InvalidUserId> {
        let id = id.into();
        if id.is_empty() || id.trim().is_empty() {
            return Err(InvalidUserId::Empty);
        }
        if id.len() > MAX_USER_ID_LEN {
            return Err(InvalidUserId::TooLong(id.len()));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(InvalidUserId::BadCharacter);
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reason a user id was rejected by [`UserId::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUserId {
    /// Id is empty or whitespace only.
    #[error("user id cannot be empty or whitespace only")]
    Empty,
    /// Id exceeds [`MAX_USER_ID_LEN`] characters.
    #[error("user id exceeds {MAX_USER_ID_LEN} characters (got {0})")]
    TooLong(usize),
    /// Id contains a character outside `[a-zA-Z0-9_-]`.
    #[error("user id may only contain letters, digits, '_' and '-'")]
    BadCharacter,
}

// ============================================================================
// Statuses
// ============================================================================

/// Lifecycle status of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Being configured, not visible yet.
    Draft,
    /// Announced publicly.
    Published,
    /// Called off.
    Cancelled,
    /// Already took place.
    Completed,
    /// Open for registration.
    Active,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Active => "active",
        };
        write!(f, "{s}")
    }
}

/// Status of a registration record.
///
/// The only legal transition is `Waitlist` → `Confirmed`, performed by the
/// promotion step of the release engine; never the reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Holds a capacity slot.
    Confirmed,
    /// Queued on the event's waitlist.
    Waitlist,
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Confirmed => "confirmed",
            Self::Waitlist => "waitlist",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// Records
// ============================================================================

/// The persisted event record.
///
/// `registered_count` is the authoritative capacity counter: it is only ever
/// moved through the store's atomic primitives, never written from a cached
/// copy. Invariants: `registered_count <= capacity`; a user id appears in
/// `waitlist` at most once and never while also holding a confirmed
/// registration for this event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub event_id: EventId,
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Where the event takes place.
    pub location: String,
    /// Maximum number of confirmed registrations.
    pub capacity: u32,
    /// Who organizes the event.
    pub organizer: String,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Number of confirmed registrations (authoritative counter).
    pub registered_count: u32,
    /// Whether overflow registrations queue on the waitlist.
    pub waitlist_enabled: bool,
    /// FIFO queue of users waiting for a slot.
    pub waitlist: Vec<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Builds a fresh event record from its creation attributes.
    #[must_use]
    pub fn new(event_id: EventId, attrs: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            event_id,
            title: attrs.title,
            description: attrs.description,
            date: attrs.date,
            location: attrs.location,
            capacity: attrs.capacity,
            organizer: attrs.organizer,
            status: attrs.status,
            registered_count: 0,
            waitlist_enabled: attrs.waitlist_enabled,
            waitlist: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Remaining capacity slots (computed, not stored).
    #[must_use]
    pub const fn available_spots(&self) -> u32 {
        self.capacity.saturating_sub(self.registered_count)
    }

    /// Number of users currently queued on the waitlist.
    #[must_use]
    pub fn waitlist_count(&self) -> usize {
        self.waitlist.len()
    }

    /// Whether every capacity slot is taken.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.registered_count >= self.capacity
    }
}

/// Attributes for creating an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Where the event takes place.
    pub location: String,
    /// Maximum number of confirmed registrations.
    pub capacity: u32,
    /// Who organizes the event.
    pub organizer: String,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Whether overflow registrations queue on the waitlist.
    pub waitlist_enabled: bool,
}

/// Partial update of an event's editable attributes.
///
/// `None` fields are left untouched. The capacity counter and waitlist are
/// deliberately absent: they move only through the store's atomic
/// primitives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New date, if changing.
    pub date: Option<DateTime<Utc>>,
    /// New location, if changing.
    pub location: Option<String>,
    /// New capacity, if changing.
    pub capacity: Option<u32>,
    /// New organizer, if changing.
    pub organizer: Option<String>,
    /// New lifecycle status, if changing.
    pub status: Option<EventStatus>,
}

impl EventPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
            && self.organizer.is_none()
            && self.status.is_none()
    }

    /// Applies the patch to an event record in place and bumps `updated_at`.
    pub fn apply(self, event: &mut Event, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(organizer) = self.organizer {
            event.organizer = organizer;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        event.updated_at = now;
    }
}

/// The persisted user record.
///
/// Users are immutable after creation; there is no update path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp (equal to `created_at` in practice).
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh user record.
    #[must_use]
    pub const fn new(user_id: UserId, name: String, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A registration, keyed by the (user, event) pair.
///
/// `event_title` and `event_date` are denormalized at creation time and
/// never refreshed when the event is later edited: they are an audit
/// snapshot of what the user signed up for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// The registered user.
    pub user_id: UserId,
    /// The event registered for.
    pub event_id: EventId,
    /// Confirmed slot or waitlist membership.
    pub status: RegistrationStatus,
    /// When the registration was created.
    pub registered_at: DateTime<Utc>,
    /// Event title at registration time.
    pub event_title: String,
    /// Event date at registration time.
    pub event_date: DateTime<Utc>,
}
