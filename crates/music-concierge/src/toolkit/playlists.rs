//! Playlist Tools
//!
//! The playlist-agent tool subset: create, extend, and inspect playlists via
//! the streaming client.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::streaming::StreamingClient;

/// Tool for creating a new playlist
pub struct CreatePlaylistTool {
    client: Arc<dyn StreamingClient>,
}

impl CreatePlaylistTool {
    pub fn new(client: Arc<dyn StreamingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreatePlaylistTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "createPlaylist".into(),
            description: "Create a new playlist for the current user. Returns the playlist ID for adding tracks.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "name".into(),
                    param_type: "string".into(),
                    description: "Playlist name".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "description".into(),
                    param_type: "string".into(),
                    description: "Playlist description".into(),
                    required: false,
                    default: Some(serde_json::json!("")),
                    enum_values: None,
                },
                ParameterSchema {
                    name: "public".into(),
                    param_type: "boolean".into(),
                    description: "Whether the playlist is publicly visible".into(),
                    required: false,
                    default: Some(serde_json::json!(false)),
                    enum_values: None,
                },
            ],
            category: Some("playlist".into()),
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let name = call
            .arguments
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("New Playlist");
        let description = call
            .arguments
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let public = call
            .arguments
            .get("public")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        match self.client.create_playlist(name, description, public).await {
            Ok(playlist) => {
                let output = format!(
                    "Created playlist '{}' (id: {}, {})",
                    playlist.name,
                    playlist.id,
                    if playlist.public { "public" } else { "private" }
                );
                let data = serde_json::to_value(&playlist)?;
                Ok(ToolResult::success("createPlaylist", output).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure("createPlaylist", e.to_string())),
        }
    }
}

/// Tool for adding tracks to an existing playlist
pub struct AddTracksToPlaylistTool {
    client: Arc<dyn StreamingClient>,
}

impl AddTracksToPlaylistTool {
    pub fn new(client: Arc<dyn StreamingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AddTracksToPlaylistTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "addTracksToPlaylist".into(),
            description: "Add tracks (by URI) to an existing playlist.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "playlistId".into(),
                    param_type: "string".into(),
                    description: "Target playlist ID".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "trackUris".into(),
                    param_type: "array".into(),
                    description: "Track URIs to add, in order".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
            ],
            category: Some("playlist".into()),
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let playlist_id = call
            .arguments
            .get("playlistId")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let uris: Vec<String> = call
            .arguments
            .get("trackUris")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        match self.client.add_tracks(playlist_id, &uris).await {
            Ok(added) => Ok(ToolResult::success(
                "addTracksToPlaylist",
                format!("Added {} of {} track(s) to playlist {}", added, uris.len(), playlist_id),
            )),
            Err(e) => Ok(ToolResult::failure("addTracksToPlaylist", e.to_string())),
        }
    }
}

/// Tool for listing the user's playlists
pub struct GetMyPlaylistsTool {
    client: Arc<dyn StreamingClient>,
}

impl GetMyPlaylistsTool {
    pub fn new(client: Arc<dyn StreamingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetMyPlaylistsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "getMyPlaylists".into(),
            description: "List the current user's playlists with IDs and track counts.".into(),
            parameters: Vec::new(),
            category: Some("playlist".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        match self.client.my_playlists().await {
            Ok(playlists) => {
                if playlists.is_empty() {
                    return Ok(ToolResult::success("getMyPlaylists", "No playlists yet."));
                }

                let mut output = format!("{} playlist(s):\n", playlists.len());
                for p in &playlists {
                    output.push_str(&format!(
                        "  {} (id: {}, {} tracks)\n",
                        p.name, p.id, p.track_count
                    ));
                }

                let data = serde_json::to_value(&playlists)?;
                Ok(ToolResult::success("getMyPlaylists", output.trim()).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure("getMyPlaylists", e.to_string())),
        }
    }
}

/// Tool for listing the tracks on a playlist
pub struct GetPlaylistTracksTool {
    client: Arc<dyn StreamingClient>,
}

impl GetPlaylistTracksTool {
    pub fn new(client: Arc<dyn StreamingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetPlaylistTracksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "getPlaylistTracks".into(),
            description: "List the tracks on a playlist.".into(),
            parameters: vec![ParameterSchema {
                name: "playlistId".into(),
                param_type: "string".into(),
                description: "Playlist ID".into(),
                required: true,
                default: None,
                enum_values: None,
            }],
            category: Some("playlist".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let playlist_id = call
            .arguments
            .get("playlistId")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        match self.client.playlist_tracks(playlist_id).await {
            Ok(tracks) => {
                let mut output = format!("{} track(s):\n", tracks.len());
                for track in &tracks {
                    output.push_str(&format!("  {}\n", track.summary()));
                }

                let data = serde_json::to_value(&tracks)?;
                Ok(ToolResult::success("getPlaylistTracks", output.trim()).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure("getPlaylistTracks", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::MockStreamingClient;
    use serde_json::json;

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            name: name.into(),
            arguments: serde_json::from_value(arguments).unwrap(),
            id: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_add_then_list() {
        let client = Arc::new(MockStreamingClient::new());

        let create = CreatePlaylistTool::new(client.clone());
        let result = create
            .execute(&call(
                "createPlaylist",
                json!({"name": "Rainy Days", "description": "Songs about rain"}),
            ))
            .await
            .unwrap();
        assert!(result.success);

        let playlist_id = result.data.unwrap()["id"].as_str().unwrap().to_string();

        let add = AddTracksToPlaylistTool::new(client.clone());
        let result = add
            .execute(&call(
                "addTracksToPlaylist",
                json!({
                    "playlistId": playlist_id,
                    "trackUris": ["spotify:track:3GCdLUSn", "spotify:track:0J4sbYPn"]
                }),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("Added 2"));

        let list = GetPlaylistTracksTool::new(client.clone());
        let result = list
            .execute(&call("getPlaylistTracks", json!({"playlistId": playlist_id})))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("Purple Rain"));
    }

    #[tokio::test]
    async fn test_add_to_missing_playlist_fails_gracefully() {
        let client = Arc::new(MockStreamingClient::new());
        let add = AddTracksToPlaylistTool::new(client);

        let result = add
            .execute(&call(
                "addTracksToPlaylist",
                json!({"playlistId": "missing", "trackUris": []}),
            ))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("Playlist not found"));
    }
}
