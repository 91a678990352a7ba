/// In-memory catalog
use async_trait::async_trait;
use soundroom_core::{Catalog, Result, SoundroomError, Track};

/// Catalog over a fixed track list
///
/// Stands in for an external catalog service; tracks are usually loaded from
/// a JSON file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tracks: Vec<Track>,
}

impl InMemoryCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a JSON array of tracks
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Ok(Self::new(tracks))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    /// Case-insensitive match on title or any artist; blank text matches
    /// nothing
    async fn search(&self, text: &str) -> Result<Vec<Track>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .tracks
            .iter()
            .filter(|track| {
                track.title.to_lowercase().contains(&needle)
                    || track
                        .artists
                        .iter()
                        .any(|artist| artist.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn track_metadata(&self, uri: &str) -> Result<Track> {
        self.tracks
            .iter()
            .find(|track| track.uri == uri)
            .cloned()
            .ok_or_else(|| SoundroomError::track_not_found(uri))
    }
}
