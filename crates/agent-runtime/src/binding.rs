//! Prompt-Level Tool Binding
//!
//! For backends without native function calling, tools are bound by
//! describing the catalog in the system prompt and asking the model to emit
//! a fenced ```tool JSON block. This module renders that prompt section and
//! parses the block back out of model output.

use agent_core::tool::{ToolCall, ToolSchema};

/// Render the tool catalog as a system prompt section.
pub fn render_tool_prompt(schemas: &[ToolSchema], parallel_tool_calls: bool) -> String {
    let mut prompt = String::from("## Available Tools\n\n");
    prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
    prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"arg\": \"value\"}}\n```\n\n");

    if !parallel_tool_calls {
        prompt.push_str("Request at most ONE tool call per response.\n");
    }
    prompt.push_str(
        "Numeric arguments must be plain numbers, never quoted strings \
         (correct: \"limit\": 10, wrong: \"limit\": \"10\").\n\n",
    );

    for schema in schemas {
        prompt.push_str(&format!("### {}\n", schema.name));
        prompt.push_str(&format!("{}\n", schema.description));

        if !schema.parameters.is_empty() {
            prompt.push_str("**Parameters:**\n");
            for param in &schema.parameters {
                let required = if param.required { " (required)" } else { "" };
                prompt.push_str(&format!(
                    "- `{}` ({}){}: {}\n",
                    param.name, param.param_type, required, param.description
                ));
            }
        }
        prompt.push('\n');
    }

    prompt
}

/// Parse tool calls from model output.
///
/// Looks for a fenced ```tool block first, then falls back to a bare JSON
/// object with a "tool" key. Returns an empty vec for a final answer.
pub fn parse_tool_calls(content: &str) -> Vec<ToolCall> {
    if let Some(call) = parse_fenced_block(content).or_else(|| parse_inline(content)) {
        return vec![call];
    }
    Vec::new()
}

fn parse_fenced_block(content: &str) -> Option<ToolCall> {
    let tool_start = "```tool";
    let tool_end = "```";

    let start_idx = content.find(tool_start)?;
    let after_marker = &content[start_idx + tool_start.len()..];
    let end_idx = after_marker.find(tool_end)?;
    let json_str = after_marker[..end_idx].trim();

    parse_call(json_str)
}

fn parse_inline(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    parse_call(&content[start..=end])
}

fn parse_call(json_str: &str) -> Option<ToolCall> {
    let mut call = serde_json::from_str::<ToolCall>(json_str).ok()?;
    if call.id.is_none() {
        call.id = Some(uuid::Uuid::new_v4().to_string());
    }
    Some(call)
}

/// Strip the fenced tool block from content, leaving any surrounding prose.
pub fn strip_tool_block(content: &str) -> String {
    let tool_start = "```tool";

    if let Some(start_idx) = content.find(tool_start) {
        let after_marker = &content[start_idx + tool_start.len()..];
        if let Some(end_idx) = after_marker.find("```") {
            let mut stripped = String::new();
            stripped.push_str(content[..start_idx].trim_end());
            stripped.push_str(after_marker[end_idx + 3..].trim_start());
            return stripped.trim().to_string();
        }
    }

    content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::tool::ParameterSchema;

    fn sample_schema() -> ToolSchema {
        ToolSchema {
            name: "searchSpotify".into(),
            description: "Search for tracks".into(),
            parameters: vec![ParameterSchema {
                name: "limit".into(),
                param_type: "number".into(),
                description: "Max results".into(),
                required: false,
                default: None,
                enum_values: None,
            }],
            category: Some("search".into()),
            has_side_effects: false,
        }
    }

    #[test]
    fn test_render_tool_prompt() {
        let prompt = render_tool_prompt(&[sample_schema()], false);
        assert!(prompt.contains("searchSpotify"));
        assert!(prompt.contains("at most ONE tool call"));
        assert!(prompt.contains("never quoted strings"));
    }

    #[test]
    fn test_parse_fenced_block() {
        let content = r#"Let me search.
```tool
{"tool": "searchSpotify", "arguments": {"query": "rain", "limit": 5}}
```"#;

        let calls = parse_tool_calls(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "searchSpotify");
        assert!(calls[0].id.is_some());
        assert_eq!(
            calls[0].arguments.get("limit"),
            Some(&serde_json::json!(5))
        );
    }

    #[test]
    fn test_parse_inline_fallback() {
        let content = r#"{"tool": "getMyPlaylists", "arguments": {}}"#;
        let calls = parse_tool_calls(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "getMyPlaylists");
    }

    #[test]
    fn test_plain_text_is_final_answer() {
        assert!(parse_tool_calls("Here are five songs about rain.").is_empty());
    }

    #[test]
    fn test_strip_tool_block() {
        let content = "Searching now.\n```tool\n{\"tool\": \"searchSpotify\", \"arguments\": {}}\n```";
        assert_eq!(strip_tool_block(content), "Searching now.");
    }
}
