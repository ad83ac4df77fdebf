//! User management API endpoints.
//!
//! - POST /users - Create a new user (conditional create, 409 on duplicate)
//! - GET /users/:id - Get a user

use super::{check_len, check_not_blank};
use crate::error::AppError;
use crate::server::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rsvp_core::types::{User, UserId};
use rsvp_core::{Clock, RegistryStore};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Client-chosen user id (`[a-zA-Z0-9_-]+`, 1-100 characters)
    pub user_id: String,
    /// Display name (1-200 characters, not whitespace only)
    pub name: String,
}

/// User details response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user_id =
        UserId::parse(request.user_id).map_err(|err| AppError::bad_request(err.to_string()))?;
    check_len("name", &request.name, 1, 200)?;
    check_not_blank("name", &request.name)?;

    let user = User::new(user_id, request.name, state.clock.now());
    state.store.create_user(user.clone()).await?;
    tracing::info!(user_id = %user.user_id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a specific user by id.
pub async fn get_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id =
        UserId::parse(user_id).map_err(|err| AppError::bad_request(err.to_string()))?;
    let user = state
        .store
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user", &user_id))?;
    Ok(Json(user.into()))
}
