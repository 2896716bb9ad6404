//! Mock Streaming Client
//!
//! For testing and demo purposes. Serves a small static catalog and keeps
//! created playlists in memory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{SearchKind, StreamingClient};
use crate::error::{ConciergeError, Result};
use crate::model::{Playlist, Track};

/// Mock streaming client with a static catalog and in-memory playlists
pub struct MockStreamingClient {
    catalog: Vec<Track>,
    playlists: RwLock<HashMap<String, (Playlist, Vec<Track>)>>,
}

impl Default for MockStreamingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStreamingClient {
    pub fn new() -> Self {
        Self {
            catalog: builtin_catalog(),
            playlists: RwLock::new(HashMap::new()),
        }
    }

    fn find_track(&self, uri: &str) -> Option<Track> {
        self.catalog
            .iter()
            .find(|t| t.uri == uri || t.id == uri)
            .cloned()
    }
}

fn builtin_catalog() -> Vec<Track> {
    // (id, title, artist, album)
    let rows = [
        ("6b8Be6lj", "Umbrella", "Rihanna", "Good Girl Gone Bad"),
        ("1hKdDCpi", "Set Fire to the Rain", "Adele", "21"),
        ("3GCdLUSn", "Purple Rain", "Prince", "Purple Rain"),
        ("0J4sbYPn", "November Rain", "Guns N' Roses", "Use Your Illusion I"),
        ("2VOomzT6", "Have You Ever Seen the Rain", "Creedence Clearwater Revival", "Pendulum"),
        ("5xTtaWoa", "Riders on the Storm", "The Doors", "L.A. Woman"),
        ("7ef4DlsG", "Here Comes the Sun", "The Beatles", "Abbey Road"),
        ("4u7EnebE", "Bohemian Rhapsody", "Queen", "A Night at the Opera"),
        ("1BxfuPKG", "Blinding Lights", "The Weeknd", "After Hours"),
        ("0VjIjW4G", "Take Five", "Dave Brubeck", "Time Out"),
        ("3n3Ppam7", "So What", "Miles Davis", "Kind of Blue"),
        ("6DCZcSsp", "Dancing Queen", "ABBA", "Arrival"),
    ];

    rows.iter()
        .map(|(id, title, artist, album)| {
            let mut track = Track::new(*id, *title, *artist, *album);
            track.duration_ms = 210_000;
            track
        })
        .collect()
}

#[async_trait]
impl StreamingClient for MockStreamingClient {
    async fn search(&self, query: &str, kind: SearchKind, limit: usize) -> Result<Vec<Track>> {
        let query = query.to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();

        let matches: Vec<Track> = self
            .catalog
            .iter()
            .filter(|t| {
                let haystack = match kind {
                    SearchKind::Artist => t.artist.to_lowercase(),
                    SearchKind::Album => t.album.to_lowercase(),
                    _ => format!(
                        "{} {} {}",
                        t.title.to_lowercase(),
                        t.artist.to_lowercase(),
                        t.album.to_lowercase()
                    ),
                };
                terms.iter().any(|term| haystack.contains(term))
            })
            .take(limit.max(1))
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(ConciergeError::NoTracksFound(query));
        }

        Ok(matches)
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        let id = Uuid::new_v4().to_string();
        let mut playlist = Playlist::new(&id, name, description);
        playlist.public = public;

        self.playlists
            .write()
            .unwrap()
            .insert(id, (playlist.clone(), Vec::new()));

        Ok(playlist)
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<usize> {
        let mut playlists = self.playlists.write().unwrap();
        let (playlist, tracks) = playlists
            .get_mut(playlist_id)
            .ok_or_else(|| ConciergeError::PlaylistNotFound(playlist_id.to_string()))?;

        let mut added = 0;
        for uri in uris {
            if let Some(track) = self.find_track(uri) {
                tracks.push(track);
                added += 1;
            }
        }

        playlist.track_count = tracks.len();
        Ok(added)
    }

    async fn my_playlists(&self) -> Result<Vec<Playlist>> {
        let playlists = self.playlists.read().unwrap();
        Ok(playlists.values().map(|(p, _)| p.clone()).collect())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let playlists = self.playlists.read().unwrap();
        playlists
            .get(playlist_id)
            .map(|(_, tracks)| tracks.clone())
            .ok_or_else(|| ConciergeError::PlaylistNotFound(playlist_id.to_string()))
    }

    async fn health_check(&self) -> bool {
        true // Mock always healthy
    }

    fn name(&self) -> &str {
        "MockStreaming"
    }
}
