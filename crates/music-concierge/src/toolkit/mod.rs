//! Toolkit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the music
//! concierge. Tool names match the external tool server's catalog entries
//! exactly; the registry partitions on them for agent specialization.

mod playlists;
mod search_tracks;
mod weather;
mod web_search;

pub use playlists::{
    AddTracksToPlaylistTool, CreatePlaylistTool, GetMyPlaylistsTool, GetPlaylistTracksTool,
};
pub use search_tracks::SearchSpotifyTool;
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;

/// Catalog names of the search-agent tool subset
pub const SEARCH_TOOL_NAMES: &[&str] = &["searchSpotify"];

/// Catalog names of the playlist-agent tool subset
pub const PLAYLIST_TOOL_NAMES: &[&str] = &[
    "createPlaylist",
    "addTracksToPlaylist",
    "getMyPlaylists",
    "getPlaylistTracks",
];
