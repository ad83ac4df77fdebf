//! HTTP API integration tests.
//!
//! Each test boots the full router on an ephemeral port and talks to it
//! over real HTTP with reqwest, so routing, extraction, validation, and
//! error mapping are all exercised end to end against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::StatusCode;
use rsvp_core::{Registrar, SystemClock};
use rsvp_memory::MemoryStore;
use rsvp_server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

/// Boots a fresh server instance and returns its base URL.
async fn spawn_server() -> String {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(SystemClock);
    let registrar = Arc::new(Registrar::new(store.clone(), clock.clone()));
    let app = build_router(AppState::new(store, registrar, clock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });
    format!("http://{addr}")
}

fn event_body(id: &str, capacity: u32, waitlist_enabled: bool) -> Value {
    json!({
        "eventId": id,
        "title": "Rust meetup",
        "description": "monthly meetup",
        "date": "2026-09-01T18:00:00Z",
        "location": "community hall",
        "capacity": capacity,
        "organizer": "meetup crew",
        "status": "active",
        "waitlistEnabled": waitlist_enabled,
    })
}

async fn create_event(client: &reqwest::Client, base: &str, body: &Value) -> reqwest::Response {
    client
        .post(format!("{base}/events"))
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn create_user(client: &reqwest::Client, base: &str, id: &str) -> reqwest::Response {
    client
        .post(format!("{base}/users"))
        .json(&json!({"userId": id, "name": format!("user {id}")}))
        .send()
        .await
        .unwrap()
}

async fn register(
    client: &reqwest::Client,
    base: &str,
    user_id: &str,
    event_id: &str,
) -> reqwest::Response {
    client
        .post(format!("{base}/users/{user_id}/registrations"))
        .json(&json!({"eventId": event_id}))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_and_banner_respond() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    let banner: Value = client
        .get(base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(banner["message"].as_str().unwrap().contains("rsvp"));
}

#[tokio::test]
async fn event_crud_lifecycle() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    // Create with a client-supplied id.
    let resp = create_event(&client, &base, &event_body("meetup-1", 30, false)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["eventId"], "meetup-1");
    assert_eq!(created["registeredCount"], 0);
    assert_eq!(created["availableSpots"], 30);
    assert_eq!(created["waitlistCount"], 0);

    // The same id cannot be created twice.
    let resp = create_event(&client, &base, &event_body("meetup-1", 30, false)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Read it back.
    let resp = client
        .get(format!("{base}/events/meetup-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Update a couple of fields.
    let resp = client
        .put(format!("{base}/events/meetup-1"))
        .json(&json!({"title": "Rust meetup (moved)", "capacity": 40}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["title"], "Rust meetup (moved)");
    assert_eq!(updated["capacity"], 40);

    // An empty update is rejected.
    let resp = client
        .put(format!("{base}/events/meetup-1"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Delete, then reads 404.
    let resp = client
        .delete(format!("{base}/events/meetup-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = client
        .get(format!("{base}/events/meetup-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_events_filters_by_status() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let mut draft = event_body("draft-1", 10, false);
    draft["status"] = json!("draft");
    create_event(&client, &base, &draft).await;
    create_event(&client, &base, &event_body("active-1", 10, false)).await;

    let all: Value = client
        .get(format!("{base}/events"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let active: Value = client
        .get(format!("{base}/events?status=active"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["eventId"], "active-1");
}

#[tokio::test]
async fn event_validation_rejects_bad_shapes() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let mut body = event_body("bad-1", 10, false);
    body["capacity"] = json!(0);
    let resp = create_event(&client, &base, &body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut body = event_body("bad-2", 10, false);
    body["title"] = json!("");
    let resp = create_event(&client, &base, &body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn user_creation_and_duplicates() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = create_user(&client, &base, "alice").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = create_user(&client, &base, "alice").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Bad ids and blank names never reach the store.
    let resp = client
        .post(format!("{base}/users"))
        .json(&json!({"userId": "not ok!", "name": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = client
        .post(format!("{base}/users"))
        .json(&json!({"userId": "bob", "name": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let fetched: Value = client
        .get(format!("{base}/users/alice"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["userId"], "alice");
    assert_eq!(
        client
            .get(format!("{base}/users/nobody"))
            .send()
            .await
            .unwrap()
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn registration_round_trip_with_promotion() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    create_event(&client, &base, &event_body("solo", 1, true)).await;
    create_user(&client, &base, "a").await;
    create_user(&client, &base, "b").await;

    // A takes the only slot.
    let resp = register(&client, &base, "a", "solo").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let a: Value = resp.json().await.unwrap();
    assert_eq!(a["status"], "confirmed");
    assert_eq!(a["eventTitle"], "Rust meetup");

    // B overflows to the waitlist.
    let resp = register(&client, &base, "b", "solo").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let b: Value = resp.json().await.unwrap();
    assert_eq!(b["status"], "waitlist");

    // A leaves; B is promoted and the waitlist empties.
    let resp = client
        .delete(format!("{base}/users/a/registrations/solo"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let event: Value = client
        .get(format!("{base}/events/solo"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(event["registeredCount"], 1);
    assert_eq!(event["waitlistCount"], 0);

    let regs: Value = client
        .get(format!("{base}/users/b/registrations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(regs["total"], 1);
    assert_eq!(regs["registrations"][0]["status"], "confirmed");
}

#[tokio::test]
async fn full_event_without_waitlist_rejects() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    create_event(&client, &base, &event_body("tight", 2, false)).await;
    for id in ["a", "b", "c"] {
        create_user(&client, &base, id).await;
    }

    assert_eq!(
        register(&client, &base, "a", "tight").await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register(&client, &base, "b", "tight").await.status(),
        StatusCode::CREATED
    );

    let resp = register(&client, &base, "c", "tight").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["code"], "CONFLICT");

    let event: Value = client
        .get(format!("{base}/events/tight"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(event["registeredCount"], 2);
}

#[tokio::test]
async fn registration_error_paths() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    create_event(&client, &base, &event_body("errs", 5, false)).await;
    create_user(&client, &base, "a").await;

    // Missing user / missing event are 404s.
    assert_eq!(
        register(&client, &base, "ghost", "errs").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        register(&client, &base, "a", "missing").await.status(),
        StatusCode::NOT_FOUND
    );

    // Duplicate registration is a conflict.
    register(&client, &base, "a", "errs").await;
    assert_eq!(
        register(&client, &base, "a", "errs").await.status(),
        StatusCode::CONFLICT
    );

    // Unknown registrations cannot be deleted.
    assert_eq!(
        client
            .delete(format!("{base}/users/a/registrations/missing"))
            .send()
            .await
            .unwrap()
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn event_centric_endpoints_mirror_user_centric_ones() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    create_event(&client, &base, &event_body("mirror", 3, false)).await;
    create_user(&client, &base, "a").await;
    create_user(&client, &base, "b").await;

    let resp = client
        .post(format!("{base}/events/mirror/registrations"))
        .json(&json!({"userId": "a"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    register(&client, &base, "b", "mirror").await;

    let regs: Value = client
        .get(format!("{base}/events/mirror/registrations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(regs["total"], 2);

    let resp = client
        .delete(format!("{base}/events/mirror/registrations/a"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let event: Value = client
        .get(format!("{base}/events/mirror"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(event["registeredCount"], 1);

    // Listing against a missing event is a 404.
    assert_eq!(
        client
            .get(format!("{base}/events/missing/registrations"))
            .send()
            .await
            .unwrap()
            .status(),
        StatusCode::NOT_FOUND
    );
}
