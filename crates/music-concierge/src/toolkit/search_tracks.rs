//! Catalog Search Tool
//!
//! Wraps `StreamingClient::search` as the `searchSpotify` catalog entry.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::streaming::{SearchKind, StreamingClient};

const DEFAULT_LIMIT: usize = 10;

/// Tool for searching the streaming catalog
pub struct SearchSpotifyTool {
    client: Arc<dyn StreamingClient>,
}

impl SearchSpotifyTool {
    pub fn new(client: Arc<dyn StreamingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchSpotifyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "searchSpotify".into(),
            description: "Search for tracks, albums, artists, or playlists on the streaming service. Returns titles, artists, and track URIs usable for playlist creation.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "query".into(),
                    param_type: "string".into(),
                    description: "Search query (e.g., 'songs about rain')".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "qtype".into(),
                    param_type: "string".into(),
                    description: "What to search for".into(),
                    required: false,
                    default: Some(serde_json::json!("track")),
                    enum_values: Some(vec![
                        serde_json::json!("track"),
                        serde_json::json!("album"),
                        serde_json::json!("artist"),
                        serde_json::json!("playlist"),
                    ]),
                },
                ParameterSchema {
                    name: "limit".into(),
                    param_type: "number".into(),
                    description: "Maximum number of results".into(),
                    required: false,
                    default: Some(serde_json::json!(10)),
                    enum_values: None,
                },
            ],
            category: Some("search".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let kind = call
            .arguments
            .get("qtype")
            .and_then(|v| v.as_str())
            .map(SearchKind::parse)
            .unwrap_or(SearchKind::Track);

        let limit = call
            .arguments
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_LIMIT);

        match self.client.search(query, kind, limit).await {
            Ok(tracks) => {
                let mut output = format!("Found {} result(s) for '{}':\n", tracks.len(), query);
                for track in &tracks {
                    output.push_str(&format!("  {}\n", track.summary()));
                }

                let data = serde_json::to_value(&tracks)?;
                Ok(ToolResult::success("searchSpotify", output.trim()).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure("searchSpotify", e.to_string())),
        }
    }
}
