/// Queue API routes
use crate::{
    api::rooms::room_handle,
    error::Result,
    middleware::CurrentUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use soundroom_core::{EntryId, QueueEntry};

#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub entry: EntryId,
    pub votes: usize,
}

/// POST /api/rooms/:room/queue - Add a catalog track to the queue
pub async fn enqueue(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path(room): Path<String>,
    Json(req): Json<EnqueueRequest>,
) -> Result<(StatusCode, Json<QueueEntry>)> {
    let handle = room_handle(&app_state, &room).await?;
    let entry = handle.enqueue(&req.uri, user.into_voter_id()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/rooms/:room/queue/:entry - Remove an entry
pub async fn remove_entry(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path((room, entry)): Path<(String, String)>,
) -> Result<Json<QueueEntry>> {
    let entry: EntryId = entry.parse()?;
    let handle = room_handle(&app_state, &room).await?;
    let removed = handle.remove_entry(entry, user.into_voter_id()).await?;
    Ok(Json(removed))
}

/// POST /api/rooms/:room/queue/:entry/vote - Upvote an entry
pub async fn vote(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path((room, entry)): Path<(String, String)>,
) -> Result<Json<VoteResponse>> {
    let entry: EntryId = entry.parse()?;
    let handle = room_handle(&app_state, &room).await?;
    let votes = handle.vote(entry, user.into_voter_id()).await?;
    Ok(Json(VoteResponse { entry, votes }))
}

/// DELETE /api/rooms/:room/queue/:entry/vote - Withdraw an upvote
pub async fn unvote(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Path((room, entry)): Path<(String, String)>,
) -> Result<Json<VoteResponse>> {
    let entry: EntryId = entry.parse()?;
    let handle = room_handle(&app_state, &room).await?;
    let votes = handle.unvote(entry, user.into_voter_id()).await?;
    Ok(Json(VoteResponse { entry, votes }))
}
