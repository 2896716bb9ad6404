//! Request Classifier
//!
//! Deterministic, pure keyword classification of free-text requests into the
//! task categories the router dispatches on. Case-insensitive substring
//! membership, playlist keywords checked first. The matching semantics are
//! intentionally simple (no tokenization or stemming); downstream tests
//! depend on them exactly as written.

use serde::{Deserialize, Serialize};

/// Task category a request falls into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Search,
    Playlist,
    General,
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskCategory::Search => write!(f, "search"),
            TaskCategory::Playlist => write!(f, "playlist"),
            TaskCategory::General => write!(f, "general"),
        }
    }
}

/// Playlist-related keywords. Checked first: playlist intent dominates
/// search intent when both appear.
pub const PLAYLIST_KEYWORDS: &[&str] = &[
    "playlist",
    "create",
    "add tracks",
    "add songs",
    "make a playlist",
];

/// Search-related keywords
pub const SEARCH_KEYWORDS: &[&str] = &[
    "search", "find", "look for", "discover", "track", "song", "artist", "album",
];

/// Classify a request into a task category.
///
/// No side effects, no failure modes: anything matching neither keyword set
/// is `General`.
pub fn classify(text: &str) -> TaskCategory {
    let lowered = text.to_lowercase();

    if PLAYLIST_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        TaskCategory::Playlist
    } else if SEARCH_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        TaskCategory::Search
    } else {
        TaskCategory::General
    }
}
