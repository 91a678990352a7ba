/// Room API routes
use crate::{
    error::{Result, ServerError},
    middleware::CurrentUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use soundroom_core::{PlaybackSnapshot, RoomId};
use soundroom_session::SessionHandle;

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub room: String,

    /// Provider name; the configured default when absent
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub room: RoomId,
    pub provider: String,
}

/// Resolve a running room from a path segment
pub(crate) async fn room_handle(app_state: &AppState, room: &str) -> Result<SessionHandle> {
    Ok(app_state.rooms.get(&RoomId::new(room)).await?)
}

/// GET /api/rooms - List running rooms
pub async fn list_rooms(State(app_state): State<AppState>) -> Json<RoomListResponse> {
    Json(RoomListResponse {
        rooms: app_state.rooms.list().await,
    })
}

/// POST /api/rooms - Start a room
pub async fn create_room(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>)> {
    let room = req.room.trim();
    if room.is_empty() {
        return Err(ServerError::BadRequest("Room id must not be empty".to_string()));
    }

    let provider = req
        .provider
        .unwrap_or_else(|| app_state.rooms.config().provider.clone());
    let handle = app_state.rooms.create(RoomId::new(room), &provider).await?;

    tracing::info!(room = %handle.room(), user = %user.voter_id(), "room opened");

    Ok((
        StatusCode::CREATED,
        Json(RoomResponse {
            room: handle.room().clone(),
            provider,
        }),
    ))
}

/// DELETE /api/rooms/:room - Tear a room down
pub async fn delete_room(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path(room): Path<String>,
) -> Result<StatusCode> {
    let room = RoomId::new(room);
    app_state.rooms.teardown(&room).await?;
    tracing::info!(room = %room, user = %user.voter_id(), "room closed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/rooms/:room/snapshot - Current room state
pub async fn get_snapshot(
    State(app_state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<PlaybackSnapshot>> {
    let handle = room_handle(&app_state, &room).await?;
    Ok(Json(handle.snapshot().await?))
}
