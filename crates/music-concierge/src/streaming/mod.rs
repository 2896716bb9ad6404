//! Streaming Service Integration
//!
//! Abstraction over the music-streaming service's search and playlist API.
//! The concierge depends only on this trait; the wrapped HTTP API itself
//! (auth, token refresh, wire formats) lives behind implementations of it.

mod mock;

pub use mock::MockStreamingClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Playlist, Track};

/// What to search for on the streaming service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Track,
    Album,
    Artist,
    Playlist,
}

impl SearchKind {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "album" => SearchKind::Album,
            "artist" => SearchKind::Artist,
            "playlist" => SearchKind::Playlist,
            _ => SearchKind::Track,
        }
    }
}

/// Streaming service client trait (Strategy pattern)
///
/// Implement this for each backend: the real service API, a cached proxy,
/// or the mock used in tests and demos.
#[async_trait]
pub trait StreamingClient: Send + Sync {
    /// Search the catalog
    async fn search(&self, query: &str, kind: SearchKind, limit: usize) -> Result<Vec<Track>>;

    /// Create a new playlist for the current user
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist>;

    /// Add tracks (by URI) to a playlist; returns the number added
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<usize>;

    /// List the current user's playlists
    async fn my_playlists(&self) -> Result<Vec<Playlist>>;

    /// List the tracks on a playlist
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>>;

    /// Check if the service is reachable and authenticated
    async fn health_check(&self) -> bool;

    /// Client name
    fn name(&self) -> &str;
}
