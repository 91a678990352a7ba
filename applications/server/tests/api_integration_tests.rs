/// API integration tests
/// Drive the full router with in-process rooms on the simulated provider
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use soundroom_server::{create_router, middleware::USER_HEADER, state, AppState};
use soundroom_session::{ConfiguredPolicy, InMemoryCatalog, RoomRegistry, SessionConfig};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

const CATALOG: &str = r#"[
    { "id": "t1", "title": "Harbor Lights", "artists": ["The Low Tides"], "duration_ms": 200000, "uri": "sim:t1" },
    { "id": "t2", "title": "Night Shift", "artists": ["Mara Quinn"], "duration_ms": 180000, "uri": "sim:t2" },
    { "id": "t3", "title": "Slow Orbit", "artists": ["Kite District"], "duration_ms": 240000, "uri": "sim:t3" }
]"#;

/// Helper to create test app router
fn create_test_app() -> Router {
    let rooms = RoomRegistry::new(
        SessionConfig::default(),
        state::default_providers(&BTreeMap::new()),
        Arc::new(InMemoryCatalog::from_json(CATALOG).unwrap()),
        Arc::new(ConfiguredPolicy::new(["dj"], false)),
    );
    create_router(AppState::new(Arc::new(rooms)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header(USER_HEADER, user);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Create a room and let the provider log in
async fn open_room(app: &Router, room: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/rooms",
        Some("alice"),
        Some(json!({ "room": room })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    tokio::time::sleep(Duration::from_millis(10)).await;
}

async fn enqueue(app: &Router, room: &str, uri: &str, user: &str) -> Value {
    let (status, entry) = send(
        app,
        Method::POST,
        &format!("/api/rooms/{}/queue", room),
        Some(user),
        Some(json!({ "uri": uri })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    entry
}

#[tokio::test(start_paused = true)]
async fn test_health() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rooms"], 0);
}

#[tokio::test(start_paused = true)]
async fn test_search() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/api/search?q=mara", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let tracks = body.as_array().unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0]["uri"], "sim:t2");
}

#[tokio::test(start_paused = true)]
async fn test_commands_require_identity() {
    let app = create_test_app();
    open_room(&app, "lounge").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/rooms/lounge/queue",
        None,
        Some(json!({ "uri": "sim:t1" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_room_lifecycle() {
    let app = create_test_app();
    open_room(&app, "lounge").await;
    open_room(&app, "attic").await;

    let (status, body) = send(&app, Method::GET, "/api/rooms", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rooms"], json!(["attic", "lounge"]));

    let (status, body) = send(&app, Method::GET, "/api/rooms/lounge/snapshot", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");

    let (status, _) = send(&app, Method::DELETE, "/api/rooms/lounge", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/rooms/lounge/snapshot", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_provider_is_bad_request() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/rooms",
        Some("alice"),
        Some(json!({ "room": "lounge", "provider": "spotify" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn test_enqueue_starts_playback() {
    let app = create_test_app();
    open_room(&app, "lounge").await;

    let entry = enqueue(&app, "lounge", "sim:t1", "alice").await;
    assert_eq!(entry["submitted_by"], "alice");

    let (_, snapshot) = send(&app, Method::GET, "/api/rooms/lounge/snapshot", None, None).await;
    assert_eq!(snapshot["status"], "playing");
    assert_eq!(snapshot["current_entry"]["id"], entry["id"]);
    assert_eq!(snapshot["duration_seconds"], 200.0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/rooms/lounge/queue",
        Some("alice"),
        Some(json!({ "uri": "sim:missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_votes_reorder_queue() {
    let app = create_test_app();
    open_room(&app, "lounge").await;

    enqueue(&app, "lounge", "sim:t1", "alice").await;
    enqueue(&app, "lounge", "sim:t2", "alice").await;
    let third = enqueue(&app, "lounge", "sim:t3", "alice").await;
    let third_id = third["id"].as_str().unwrap();
    let vote_uri = format!("/api/rooms/lounge/queue/{}/vote", third_id);

    let (status, body) = send(&app, Method::POST, &vote_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], 1);

    let (_, snapshot) = send(&app, Method::GET, "/api/rooms/lounge/snapshot", None, None).await;
    assert_eq!(snapshot["queue"][0]["id"], third["id"]);

    let (status, body) = send(&app, Method::POST, &vote_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::DELETE, &vote_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], 0);

    let (status, _) = send(&app, Method::DELETE, &vote_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_entry_id() {
    let app = create_test_app();
    open_room(&app, "lounge").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/rooms/lounge/queue/not-a-uuid/vote",
        Some("bob"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn test_remove_entry_policy() {
    let app = create_test_app();
    open_room(&app, "lounge").await;

    enqueue(&app, "lounge", "sim:t1", "alice").await;
    let queued = enqueue(&app, "lounge", "sim:t2", "alice").await;
    let uri = format!("/api/rooms/lounge/queue/{}", queued["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, removed) = send(&app, Method::DELETE, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["id"], queued["id"]);

    let (status, _) = send(&app, Method::DELETE, &uri, Some("dj"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_transport_controls() {
    let app = create_test_app();
    open_room(&app, "lounge").await;

    let (status, _) = send(&app, Method::POST, "/api/rooms/lounge/pause", Some("dj"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    enqueue(&app, "lounge", "sim:t1", "alice").await;

    let (status, _) = send(&app, Method::POST, "/api/rooms/lounge/pause", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::POST, "/api/rooms/lounge/pause", Some("dj"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/rooms/lounge/seek",
        Some("dj"),
        Some(json!({ "seconds": 999.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let position = body["position_seconds"].as_f64().unwrap();
    assert!(position < 200.0 && position > 199.0);

    let (status, _) = send(&app, Method::POST, "/api/rooms/lounge/resume", Some("dj"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, snapshot) = send(&app, Method::GET, "/api/rooms/lounge/snapshot", None, None).await;
    assert_eq!(snapshot["status"], "playing");
}
