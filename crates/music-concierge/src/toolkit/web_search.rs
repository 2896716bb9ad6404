//! Web Search Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::websearch::WebSearchClient;

const DEFAULT_LIMIT: usize = 5;

/// Tool for searching the web
pub struct WebSearchTool {
    client: Arc<dyn WebSearchClient>,
}

impl WebSearchTool {
    pub fn new(client: Arc<dyn WebSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "webSearch".into(),
            description: "Search the web. Returns titles, URLs, and snippets.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "query".into(),
                    param_type: "string".into(),
                    description: "Search query".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "limit".into(),
                    param_type: "number".into(),
                    description: "Maximum number of results".into(),
                    required: false,
                    default: Some(serde_json::json!(5)),
                    enum_values: None,
                },
            ],
            category: Some("web".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let limit = call
            .arguments
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_LIMIT);

        match self.client.search(query, limit).await {
            Ok(hits) => {
                let mut output = format!("{} result(s):\n", hits.len());
                for hit in &hits {
                    output.push_str(&format!("  {} — {}\n    {}\n", hit.title, hit.url, hit.snippet));
                }

                let data = serde_json::to_value(&hits)?;
                Ok(ToolResult::success("webSearch", output.trim()).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure("webSearch", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websearch::MockWebSearchClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_web_search_tool() {
        let tool = WebSearchTool::new(Arc::new(MockWebSearchClient));
        let call = ToolCall {
            name: "webSearch".into(),
            arguments: serde_json::from_value(json!({"query": "best rain songs", "limit": 2}))
                .unwrap(),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("https://"));
    }
}
