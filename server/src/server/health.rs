//! Health and banner endpoints.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Liveness probe.
///
/// Returns 200 OK if the service is running. This is a simple liveness
/// check - it doesn't verify dependencies.
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}

/// Service banner response.
#[derive(Serialize)]
pub struct ServiceInfo {
    /// Human-readable service name
    pub message: String,
    /// Service version
    pub version: String,
}

/// Root banner with service name and version.
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "rsvp events API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
