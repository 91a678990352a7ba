/// Catalog search API routes
use crate::{error::Result, state::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use soundroom_core::Track;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search?q= - Search the catalog by title or artist
pub async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Track>>> {
    let tracks = app_state.rooms.search(&query.q).await?;
    Ok(Json(tracks))
}
