//! # music-concierge
//!
//! Multi-agent music concierge built on `agent-core`. Routes free-text
//! requests to specialized agents over a streaming service's search and
//! playlist tools, plus web search and weather lookups.
//!
//! ## Routing
//!
//! ```text
//!                ┌──────────────┐
//!    user ──────▶│ ORCHESTRATOR │─────────▶ END (general requests)
//!                └──────┬───────┘
//!            classify + route
//!           ┌───────────┴───────────┐
//!           ▼                       ▼
//!   ┌──────────────┐       ┌────────────────┐
//!   │ SEARCH AGENT │       │ PLAYLIST AGENT │
//!   │ searchSpotify│       │ createPlaylist │
//!   └──────┬───────┘       └───────┬────────┘
//!          │    tool calls         │
//!          └────────┬──────────────┘
//!                   ▼
//!            ┌─────────────┐
//!            │    TOOLS    │──▶ back to ORCHESTRATOR
//!            └─────────────┘
//! ```
//!
//! Tool results always flow back through the orchestrator so the model gets
//! a chance to react to tool output before the run can terminate.

pub mod classify;
pub mod error;
pub mod model;
pub mod prompts;
pub mod router;
pub mod streaming;
pub mod toolkit;
pub mod weather;
pub mod websearch;

pub use classify::{classify, TaskCategory};
pub use error::{ConciergeError, Result};
pub use model::{Forecast, PageHit, Playlist, Track};
pub use router::{ActiveAgent, ConciergeRouter, RouterConfig, SessionState};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::toolkit::{
        AddTracksToPlaylistTool, CreatePlaylistTool, GetMyPlaylistsTool, GetPlaylistTracksTool,
        SearchSpotifyTool, WeatherTool, WebSearchTool,
    };
}
