//! Error Types for the Music Concierge

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConciergeError>;

#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("Streaming service error: {0}")]
    Streaming(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("No tracks matched query: {0}")]
    NoTracksFound(String),

    #[error("Web search error: {0}")]
    WebSearch(String),

    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ConciergeError> for agent_core::AgentError {
    fn from(err: ConciergeError) -> Self {
        agent_core::AgentError::ToolExecution(err.to_string())
    }
}
