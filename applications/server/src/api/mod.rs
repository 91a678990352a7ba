/// API route modules
pub mod health;
pub mod queue;
pub mod rooms;
pub mod search;
pub mod transport;
pub mod ws;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full HTTP surface under `/api`
pub fn create_router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/search", get(search::search))
        // Rooms
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/:room", axum::routing::delete(rooms::delete_room))
        .route("/rooms/:room/snapshot", get(rooms::get_snapshot))
        .route("/rooms/:room/ws", get(ws::subscribe))
        // Queue
        .route("/rooms/:room/queue", post(queue::enqueue))
        .route(
            "/rooms/:room/queue/:entry",
            axum::routing::delete(queue::remove_entry),
        )
        .route(
            "/rooms/:room/queue/:entry/vote",
            post(queue::vote).delete(queue::unvote),
        )
        // Transport
        .route("/rooms/:room/pause", post(transport::pause))
        .route("/rooms/:room/resume", post(transport::resume))
        .route("/rooms/:room/seek", post(transport::seek));

    Router::new()
        .nest("/api", routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
