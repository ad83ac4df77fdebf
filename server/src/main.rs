//! rsvp HTTP server binary.
//!
//! Event-registration service with bounded capacity and overflow waitlists.

use rsvp_core::{Registrar, SystemClock};
use rsvp_memory::MemoryStore;
use rsvp_server::{build_router, AppState, Config};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rsvp_server=info,rsvp_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting rsvp HTTP server");

    // Load configuration
    let config = Config::from_env();
    info!(host = %config.server.host, port = config.server.port, "Configuration loaded");

    // Wire the store and the engines
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(SystemClock);
    let registrar = Arc::new(Registrar::new(store.clone(), clock.clone()));
    let state = AppState::new(store, registrar, clock);

    // Build router
    let app = build_router(state);

    // Create TCP listener
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for Ctrl+C (SIGINT) or SIGTERM (in production environments).
#[allow(clippy::expect_used)] // no useful recovery from a failed handler install
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
