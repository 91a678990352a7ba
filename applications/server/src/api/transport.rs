/// Transport control API routes (controllers only)
use crate::{
    api::rooms::room_handle,
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

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    pub seconds: f64,
}

#[derive(Debug, Serialize)]
pub struct SeekResponse {
    pub position_seconds: f64,
}

/// POST /api/rooms/:room/pause
pub async fn pause(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path(room): Path<String>,
) -> Result<StatusCode> {
    let handle = room_handle(&app_state, &room).await?;
    handle.pause(user.into_voter_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/rooms/:room/resume
pub async fn resume(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path(room): Path<String>,
) -> Result<StatusCode> {
    let handle = room_handle(&app_state, &room).await?;
    handle.resume(user.into_voter_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/rooms/:room/seek - Jump to a position; the applied (clamped)
/// position is returned
pub async fn seek(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path(room): Path<String>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<SeekResponse>> {
    if !req.seconds.is_finite() {
        return Err(ServerError::BadRequest("seconds must be a finite number".to_string()));
    }

    let handle = room_handle(&app_state, &room).await?;
    let position_seconds = handle.seek(user.into_voter_id(), req.seconds).await?;
    Ok(Json(SeekResponse { position_seconds }))
}
