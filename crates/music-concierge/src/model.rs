//! Domain Models
//!
//! Core data types for the streaming, web-search, and weather services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A track on the streaming service
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    /// Service-assigned track ID
    pub id: String,

    /// Playable URI (e.g., "spotify:track:...")
    pub uri: String,

    /// Track title
    pub title: String,

    /// Primary artist
    pub artist: String,

    /// Album name
    pub album: String,

    /// Duration in milliseconds
    pub duration_ms: u32,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            uri: format!("spotify:track:{id}"),
            id,
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            duration_ms: 0,
        }
    }

    /// One-line rendering for tool output
    pub fn summary(&self) -> String {
        format!("{} — {} [{}] ({})", self.title, self.artist, self.album, self.uri)
    }
}

/// A playlist on the streaming service
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Playlist {
    /// Service-assigned playlist ID
    pub id: String,

    /// Playlist name
    pub name: String,

    /// Description shown to the user
    pub description: String,

    /// Whether the playlist is publicly visible
    pub public: bool,

    /// Number of tracks currently on the playlist
    pub track_count: usize,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            public: false,
            track_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// A web search hit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Current weather for a location
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub temp_c: f32,
    pub condition: String,
    pub humidity_percent: u8,
}

impl Forecast {
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.1}°C, {}, {}% humidity",
            self.city, self.temp_c, self.condition, self.humidity_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_uri() {
        let track = Track::new("4uLU6hMC", "Umbrella", "Rihanna", "Good Girl Gone Bad");
        assert_eq!(track.uri, "spotify:track:4uLU6hMC");
        assert!(track.summary().contains("Umbrella"));
    }
}
