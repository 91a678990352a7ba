/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Album artwork variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Image location
    pub url: String,
}

/// Immutable catalog reference to a playable track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist names, in credit order
    pub artists: Vec<String>,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// Provider-specific reference passed to the playback provider
    pub uri: String,

    /// Album artwork, largest first
    #[serde(default)]
    pub artwork: Vec<Artwork>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        uri: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artists: Vec::new(),
            duration_ms,
            uri: uri.into(),
            artwork: Vec::new(),
        }
    }

    /// Builder-style artist credit
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artists.push(artist.into());
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Track duration in fractional seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Largest artwork variant, if any
    pub fn cover(&self) -> Option<&Artwork> {
        self.artwork.iter().max_by_key(|a| u64::from(a.width) * u64::from(a.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversions() {
        let track = Track::new(TrackId::new("t"), "Song", "sim:t", 181_500);
        assert_eq!(track.duration(), Duration::from_millis(181_500));
        assert_eq!(track.duration_seconds(), 181.5);
    }

    #[test]
    fn test_cover_picks_largest_artwork() {
        let mut track = Track::new(TrackId::new("t"), "Song", "sim:t", 1_000);
        assert!(track.cover().is_none());

        track.artwork = vec![
            Artwork { width: 64, height: 64, url: "small".into() },
            Artwork { width: 640, height: 640, url: "large".into() },
            Artwork { width: 300, height: 300, url: "medium".into() },
        ];
        assert_eq!(track.cover().map(|a| a.url.as_str()), Some("large"));
    }
}
