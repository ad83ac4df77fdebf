//! Error type for HTTP handlers.
//!
//! [`AppError`] bridges the core error taxonomy and HTTP responses: every
//! error carries a status code, a machine-stable code string, and a
//! human-readable message, and renders as a structured JSON body via
//! Axum's `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rsvp_core::error::{
    AdmissionError, RegisterError, ReleaseError, StoreError, ValidationError,
};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Construct via the status helpers (`bad_request`, `not_found`, ...) or by
/// converting one of the core error enums with `?`.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Core taxonomy mappings
// ============================================================================

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { kind, id } => {
                Self::conflict(format!("{kind} with id {id} already exists"))
            }
            StoreError::NotFound { kind, id } => Self::not_found(kind, id),
            // Lost races and aborted transactions are handled inside the
            // engines; one escaping to the boundary is an internal fault.
            err @ (StoreError::RaceLost(_)
            | StoreError::TransactionConflict(_)
            | StoreError::Backend(_)) => {
                Self::internal("Store operation failed").with_source(err.into())
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UserNotFound(id) => Self::not_found("user", id),
            ValidationError::EventNotFound(id) => Self::not_found("event", id),
            ValidationError::AlreadyRegistered { .. } => {
                Self::conflict("User already registered for this event")
            }
            ValidationError::AlreadyWaitlisted { .. } => {
                Self::conflict("User already on waitlist for this event")
            }
            ValidationError::Store(err) => err.into(),
        }
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::RetriesExhausted { .. } => {
                Self::unavailable("Event is under heavy contention, please retry")
                    .with_source(err.into())
            }
            AdmissionError::EventVanished(id) => Self::not_found("event", id),
            AdmissionError::Store(err) => err.into(),
        }
    }
}

impl From<RegisterError> for AppError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(err) => err.into(),
            RegisterError::Admission(err) => err.into(),
            RegisterError::CapacityExhausted(_) => {
                Self::conflict("Event is full and waitlist is not enabled")
            }
            RegisterError::Ledger(StoreError::AlreadyExists { .. }) => {
                Self::conflict("User already registered for this event")
            }
            RegisterError::Ledger(err) => {
                Self::internal("Failed to record registration").with_source(err.into())
            }
        }
    }
}

impl From<ReleaseError> for AppError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::RegistrationNotFound { user_id, event_id } => {
                Self::not_found("registration", format!("{user_id}/{event_id}"))
            }
            ReleaseError::EventNotFound(id) => Self::not_found("event", id),
            ReleaseError::Store(err) => err.into(),
        }
    }
}
