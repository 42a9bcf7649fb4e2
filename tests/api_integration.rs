//! Integration tests for the bearwatch HTTP API.
//!
//! These tests verify the full request/response cycle through the HTTP API.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use axum_test::TestServer;
use parking_lot::Mutex;
use serde_json::json;

use bearwatch::alert::{AlertDispatcher, Notification, NotificationSurface};
use bearwatch::error::SightingError;
use bearwatch::api::{AppState, router};
use bearwatch::map::MapFeed;
use bearwatch::model::MapUpdate;

fn create_test_state() -> AppState {
    AppState::new(AlertDispatcher::new(), MapFeed::default())
}

fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server(create_test_state());

    let response = server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_post_message_with_coordinate() {
    let server = create_test_server(create_test_state());

    let response = server
        .post("/messages")
        .json(&json!({ "text": "Location: 45.602275, 25.549736" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "sighting");
    assert_eq!(body["event"]["coordinate"]["latitude"], 45.602275);
    assert_eq!(body["event"]["coordinate"]["longitude"], 25.549736);
    assert_eq!(body["event"]["source_text"], "Location: 45.602275, 25.549736");
}

#[tokio::test]
async fn test_post_message_without_coordinate() {
    let state = create_test_state();
    let server = create_test_server(state.clone());

    let response = server
        .post("/messages")
        .json(&json!({ "text": "just saying hello" }))
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "dropped");
    assert!(state.markers.is_empty());
}

#[tokio::test]
async fn test_get_markers_empty_uses_default_center() {
    let server = create_test_server(create_test_state());

    let response = server.get("/markers").await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body["markers"].as_array().unwrap().is_empty());
    assert_eq!(body["center"]["latitude"], 45.602275);
    assert_eq!(body["center"]["longitude"], 25.549736);
}

#[tokio::test]
async fn test_markers_follow_ingest_order() {
    let server = create_test_server(create_test_state());

    for text in ["bear at 10.5, 20.5", "nothing here", "bear at -11.25, 21.75", "bear at 12.0,22.0"] {
        server.post("/messages").json(&json!({ "text": text })).await;
    }

    let response = server.get("/markers").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let markers = body["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 3);
    assert_eq!(markers[0]["coordinate"]["latitude"], 10.5);
    assert_eq!(markers[1]["coordinate"]["latitude"], -11.25);
    assert_eq!(markers[2]["coordinate"]["latitude"], 12.0);
    assert_eq!(markers[2]["label"], "Bear alert!");
    assert_eq!(body["center"]["latitude"], 12.0);
}

#[tokio::test]
async fn test_duplicate_messages_create_distinct_markers() {
    let server = create_test_server(create_test_state());

    for _ in 0..2 {
        server
            .post("/messages")
            .json(&json!({ "text": "bear at 45.0,25.0" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let body: serde_json::Value = server.get("/markers").await.json();
    assert_eq!(body["markers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_map_feed_receives_sighting() {
    let state = create_test_state();
    let mut observer = state.map_feed.subscribe();
    let server = create_test_server(state);

    server
        .post("/messages")
        .json(&json!({ "text": "Atentie! Urs detectat la coordonatele: 44.433107,26.058458" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let update = observer.try_recv().unwrap();
    assert_eq!(
        update,
        MapUpdate {
            latitude: 44.433107,
            longitude: 26.058458
        }
    );
}

/// Surface that takes a while to display each notification.
struct SlowSurface {
    finished_at: Mutex<Option<Instant>>,
}

impl NotificationSurface for SlowSurface {
    fn name(&self) -> &str {
        "slow"
    }

    fn notify(&self, _notification: &Notification) -> Result<(), SightingError> {
        thread::sleep(Duration::from_millis(300));
        *self.finished_at.lock() = Some(Instant::now());
        Ok(())
    }
}

#[tokio::test]
async fn test_slow_surface_does_not_stall_other_requests() {
    let surface = Arc::new(SlowSurface {
        finished_at: Mutex::new(None),
    });
    let state = AppState::new(
        AlertDispatcher::new().with_surface(surface.clone()),
        MapFeed::default(),
    );
    let server = create_test_server(state);

    let health_done = Mutex::new(None);
    let ingest = async {
        server
            .post("/messages")
            .json(&json!({ "text": "bear at 45.0,25.0" }))
            .await
    };
    let health = async {
        server.get("/health").await.assert_status_ok();
        *health_done.lock() = Some(Instant::now());
    };

    let (response, ()) = tokio::join!(ingest, health);

    response.assert_status(axum::http::StatusCode::CREATED);
    let health_at = health_done.lock().unwrap();
    let surface_at = surface.finished_at.lock().unwrap();
    assert!(health_at < surface_at);
}
