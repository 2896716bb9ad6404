//! Tool System
//!
//! Extensible tool framework for agent capabilities.
//! Tools are registered once at startup and invoked by the reasoning loop;
//! the registry is read-only after initialization and safe to share across
//! concurrent sessions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(alias = "tool")]
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, integer, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments before execution (optional)
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Normalize argument types against a schema.
///
/// LLMs routinely quote numeric arguments (`"limit": "10"` instead of
/// `"limit": 10`). Parseable string-typed numerics are coerced to numbers;
/// unparseable ones are rejected rather than forwarded to the tool.
pub fn normalize_arguments(schema: &ToolSchema, call: &ToolCall) -> Result<ToolCall> {
    let mut normalized = call.clone();

    for param in &schema.parameters {
        let is_numeric = matches!(param.param_type.as_str(), "number" | "integer");
        if !is_numeric {
            continue;
        }

        if let Some(serde_json::Value::String(s)) = normalized.arguments.get(&param.name) {
            // Whole numbers become JSON integers so downstream `as_u64`
            // reads keep working; only true decimals become floats.
            let trimmed = s.trim();
            let value = if param.param_type == "integer" {
                trimmed.parse::<i64>().ok().map(serde_json::Value::from)
            } else {
                trimmed
                    .parse::<i64>()
                    .ok()
                    .map(serde_json::Value::from)
                    .or_else(|| {
                        trimmed
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                            .map(serde_json::Value::Number)
                    })
            };

            match value {
                Some(v) => {
                    normalized.arguments.insert(param.name.clone(), v);
                }
                None => {
                    return Err(AgentError::ToolValidation(format!(
                        "Parameter '{}' must be a {}, got non-numeric string '{}'",
                        param.name, param.param_type, s
                    )));
                }
            }
        }
    }

    Ok(normalized)
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), Arc::new(tool));
    }

    /// Register a boxed tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Partition out the tools matching `names` (exact match) into a new
    /// registry, sharing the underlying tool instances.
    ///
    /// Used to hand each specialized agent its own disjoint tool subset.
    pub fn subset(&self, names: &[&str]) -> ToolRegistry {
        let tools = self
            .tools
            .iter()
            .filter(|(name, _)| names.contains(&name.as_str()))
            .map(|(name, tool)| (name.clone(), tool.clone()))
            .collect();

        ToolRegistry { tools }
    }

    /// Execute a tool call
    ///
    /// Arguments are normalized against the tool's schema before validation.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        let call = normalize_arguments(&tool.schema(), call)?;

        tool.validate(&call)?;
        tool.execute(&call).await
    }

    /// Execute a batch of tool calls, strictly serialized and in issue order.
    ///
    /// Never returns an error: resolution and execution failures are
    /// synthesized into failure `ToolResult`s so the session loop continues.
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            let result = match self.execute(call).await {
                Ok(mut result) => {
                    result.id = call.id.clone();
                    result
                }
                Err(e) => {
                    tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                    ToolResult {
                        name: call.name.clone(),
                        id: call.id.clone(),
                        success: false,
                        output: format!("Error: {}", e),
                        data: None,
                    }
                }
            };
            results.push(result);
        }

        results
    }

    /// Get all tool schemas (for provider tool binding)
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
