//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior: one LLM
//! completion per step, followed by serialized execution of any tool calls
//! the completion requested, until a completion arrives with no tool calls.
//!
//! The single reasoning step is exposed as [`reason`] so multi-agent routers
//! can drive specialized steps with their own prompts and tool subsets; the
//! [`Agent`] struct wraps it into the classic single-agent loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolRegistry, ToolResult};

/// One reasoning step: system prompt plus a bounded recent window of the log,
/// with the candidate tool subset bound.
///
/// Returns the assistant message, which carries either a final answer or the
/// requested tool calls. Upstream provider failure propagates as a turn-level
/// error; there is no automatic retry.
pub async fn reason(
    provider: &dyn LlmProvider,
    system_prompt: &str,
    conversation: &Conversation,
    tools: &ToolRegistry,
    options: &GenerationOptions,
    window: usize,
) -> Result<Message> {
    let mut messages = Vec::with_capacity(window + 1);
    messages.push(Message::system(system_prompt));
    messages.extend(
        conversation
            .recent(window)
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned(),
    );

    let completion = provider
        .complete(&messages, &tools.schemas(), options)
        .await?;

    let mut tool_calls = completion.tool_calls;
    if !options.parallel_tool_calls && tool_calls.len() > 1 {
        tracing::warn!(
            requested = tool_calls.len(),
            "Parallel tool calls disabled, keeping only the first"
        );
        tool_calls.truncate(1);
    }

    Ok(Message::assistant_with_tools(completion.content, tool_calls))
}

/// Render a tool result for injection into the conversation log.
pub fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        format!("[Tool '{}' returned]\n{}", result.name, result.output)
    } else {
        format!("[Tool '{}' failed]\n{}", result.name, result.output)
    }
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// How many recent log entries each reasoning step sees
    pub window: usize,

    /// Optional wall-clock budget for one full run
    pub deadline: Option<Duration>,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            window: 8,
            deadline: None,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

Use the available tools when a request needs external data or actions.
After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// The main Agent struct (single-agent control loop)
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run the agent loop over a conversation until a final answer.
    ///
    /// Transition rule: a reasoning step that returns tool calls hands off to
    /// the executor and loops; a step with none is the final answer. The loop
    /// is bounded by `max_iterations` and the optional run deadline.
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        let started = Instant::now();
        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            if let Some(budget) = self.config.deadline {
                if started.elapsed() > budget {
                    return Err(AgentError::Other(format!(
                        "Run deadline of {}s exceeded",
                        budget.as_secs()
                    )));
                }
            }

            let response = reason(
                self.provider.as_ref(),
                &self.config.system_prompt,
                conversation,
                &self.tools,
                &self.config.generation,
                self.config.window,
            )
            .await?;

            let tool_calls = response.tool_calls.clone();
            let content = response.content.clone();
            conversation.push(response);

            if tool_calls.is_empty() {
                // No tool call - this is the final response
                return Ok(content);
            }

            tracing::debug!(count = tool_calls.len(), "Executing requested tool calls");

            // Execute serialized, append results in issue order, then give the
            // model a chance to react to the output.
            let results = self.tools.execute_all(&tool_calls).await;
            for result in &results {
                conversation.push(Message::tool(format_tool_result(result), result.id.clone()));
            }
        }
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::new();
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, CompletionStream, ModelInfo, ProviderInfo};
    use crate::tool::{ParameterSchema, Tool, ToolCall, ToolSchema};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider that replays a fixed script of completions.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Completion>>,
    }

    impl ScriptedProvider {
        fn new(completions: Vec<Completion>) -> Self {
            Self {
                script: Mutex::new(completions.into()),
            }
        }

        fn answer(content: &str) -> Completion {
            Completion {
                content: content.into(),
                tool_calls: Vec::new(),
                model: "scripted".into(),
                usage: None,
                finish_reason: None,
            }
        }

        fn tool_call(name: &str, arguments: serde_json::Value) -> Completion {
            Completion {
                content: String::new(),
                tool_calls: vec![ToolCall {
                    name: name.into(),
                    arguments: serde_json::from_value(arguments).unwrap(),
                    id: Some("call-1".into()),
                }],
                model: "scripted".into(),
                usage: None,
                finish_reason: None,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "Scripted".into(),
                version: None,
                models: Vec::new(),
                supports_streaming: false,
                supports_tools: true,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[ToolSchema],
            _options: &GenerationOptions,
        ) -> Result<Completion> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<CompletionStream> {
            Err(AgentError::Provider("streaming not scripted".into()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct UppercaseTool;

    #[async_trait]
    impl Tool for UppercaseTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "uppercase".into(),
                description: "Uppercase the input".into(),
                parameters: vec![ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "Input text".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                }],
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<crate::tool::ToolResult> {
            let text = call
                .arguments
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Ok(crate::tool::ToolResult::success(
                "uppercase",
                text.to_uppercase(),
            ))
        }
    }

    fn agent_with(script: Vec<Completion>) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(UppercaseTool);
        Agent::new(
            Arc::new(ScriptedProvider::new(script)),
            Arc::new(tools),
            AgentConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_tool_call_then_final_answer() {
        let agent = agent_with(vec![
            ScriptedProvider::tool_call("uppercase", json!({"text": "rain"})),
            ScriptedProvider::answer("It is RAIN."),
        ]);

        let mut conversation = Conversation::new();
        conversation.push(Message::user("shout rain"));

        let answer = agent.run(&mut conversation).await.unwrap();
        assert_eq!(answer, "It is RAIN.");

        // user, assistant(tool call), tool result, assistant(final)
        let messages = conversation.messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[1].has_tool_calls());
        assert_eq!(messages[2].role, Role::Tool);
        assert!(messages[2].content.contains("RAIN"));
        assert!(!messages[3].has_tool_calls());
    }

    #[tokio::test]
    async fn test_no_tool_calls_terminates_immediately() {
        let agent = agent_with(vec![ScriptedProvider::answer("Hello!")]);

        let mut conversation = Conversation::new();
        conversation.push(Message::user("hi"));

        let answer = agent.run(&mut conversation).await.unwrap();
        assert_eq!(answer, "Hello!");
        assert_eq!(conversation.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_error_result_and_loop_continues() {
        let agent = agent_with(vec![
            ScriptedProvider::tool_call("missingTool", json!({})),
            ScriptedProvider::answer("Could not do that."),
        ]);

        let mut conversation = Conversation::new();
        conversation.push(Message::user("do something"));

        let answer = agent.run(&mut conversation).await.unwrap();
        assert_eq!(answer, "Could not do that.");

        let tool_msg = &conversation.messages()[2];
        assert_eq!(tool_msg.role, Role::Tool);
        assert!(tool_msg.content.contains("failed"));
    }

    #[tokio::test]
    async fn test_max_iterations_bound() {
        let looping: Vec<Completion> = (0..20)
            .map(|_| ScriptedProvider::tool_call("uppercase", json!({"text": "again"})))
            .collect();
        let agent = agent_with(looping);

        let mut conversation = Conversation::new();
        conversation.push(Message::user("loop forever"));

        let result = agent.run(&mut conversation).await;
        assert!(matches!(result, Err(AgentError::MaxIterations(10))));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        // Empty script: the first completion already fails
        let agent = agent_with(Vec::new());

        let mut conversation = Conversation::new();
        conversation.push(Message::user("hi"));

        let result = agent.run(&mut conversation).await;
        assert!(matches!(result, Err(AgentError::Provider(_))));
    }
}
