//! Multi-Agent Router
//!
//! The routing state machine: ORCHESTRATE classifies a fresh user turn and
//! makes a routing LLM call, then dispatches to a specialized reasoning step
//! (search or playlist) over that agent's disjoint tool subset. Tool calls
//! run through the shared executor node, and tool results always route back
//! through ORCHESTRATE so the model reacts to tool output before the run can
//! end. A run terminates only when a reasoning step returns no tool calls,
//! or the step bound is hit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use agent_core::{
    message::{Conversation, Message, Role},
    provider::{GenerationOptions, LlmProvider},
    reasoning::{format_tool_result, reason},
    AgentError, Result, ToolRegistry,
};

use crate::classify::{classify, TaskCategory};
use crate::prompts::{ORCHESTRATOR_PROMPT, PLAYLIST_AGENT_PROMPT, SEARCH_AGENT_PROMPT};
use crate::toolkit::{PLAYLIST_TOOL_NAMES, SEARCH_TOOL_NAMES};

/// Which agent currently owns the request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveAgent {
    Orchestrator,
    Search,
    Playlist,
}

/// Per-session state owned exclusively by the router.
///
/// Created at session start, mutated by every step, never shared across
/// concurrent mutators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    /// The ordered message log; sole carrier of conversational memory
    pub conversation: Conversation,

    /// Category of the current request
    pub task_category: TaskCategory,

    /// Agent the request is currently routed to
    pub active_agent: ActiveAgent,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            task_category: TaskCategory::General,
            active_agent: ActiveAgent::Orchestrator,
        }
    }

    /// Resume a session around an existing conversation log
    pub fn from_conversation(conversation: Conversation) -> Self {
        Self {
            conversation,
            task_category: TaskCategory::General,
            active_agent: ActiveAgent::Orchestrator,
        }
    }

    /// Push a fresh user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.conversation.push(Message::user(content));
    }

    /// Content of the most recent assistant message (the answer surfaced to
    /// the user when the run ends)
    pub fn final_answer(&self) -> Option<&str> {
        self.conversation
            .messages()
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Nodes of the routing graph
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Node {
    Orchestrate,
    SearchAgent,
    PlaylistAgent,
    Tools,
    End,
}

/// Router configuration
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Maximum graph steps per run before giving up
    pub max_steps: usize,

    /// How many recent log entries each reasoning step sees
    pub window: usize,

    /// Generation options shared by all nodes
    pub generation: GenerationOptions,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_steps: 12,
            window: 5,
            generation: GenerationOptions::default(),
        }
    }
}

/// The multi-agent concierge router
pub struct ConciergeRouter {
    provider: Arc<dyn LlmProvider>,

    /// Full catalog, used by the shared tool executor node
    tools: Arc<ToolRegistry>,

    /// Disjoint per-agent subsets, partitioned once at construction
    search_tools: ToolRegistry,
    playlist_tools: ToolRegistry,

    /// Orchestrator makes its routing call with no tools bound
    no_tools: ToolRegistry,

    config: RouterConfig,
}

impl ConciergeRouter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: RouterConfig,
    ) -> Self {
        let search_tools = tools.subset(SEARCH_TOOL_NAMES);
        let playlist_tools = tools.subset(PLAYLIST_TOOL_NAMES);

        Self {
            provider,
            tools,
            search_tools,
            playlist_tools,
            no_tools: ToolRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Run the routing graph over one user turn until a final answer.
    pub async fn run(&self, state: &mut SessionState) -> Result<String> {
        let mut node = Node::Orchestrate;
        let mut steps = 0;

        loop {
            steps += 1;
            if steps > self.config.max_steps {
                return Err(AgentError::MaxIterations(self.config.max_steps));
            }

            tracing::debug!(?node, step = steps, "Router transition");

            node = match node {
                Node::Orchestrate => self.orchestrate(state).await?,
                Node::SearchAgent => {
                    state.active_agent = ActiveAgent::Search;
                    self.specialist(state, SEARCH_AGENT_PROMPT, &self.search_tools)
                        .await?
                }
                Node::PlaylistAgent => {
                    state.active_agent = ActiveAgent::Playlist;
                    self.specialist(state, PLAYLIST_AGENT_PROMPT, &self.playlist_tools)
                        .await?
                }
                Node::Tools => self.run_tools(state).await?,
                Node::End => {
                    return Ok(state.final_answer().unwrap_or_default().to_string());
                }
            };
        }
    }

    /// ORCHESTRATE: on a fresh user turn, classify it, record routing
    /// metadata, and make the routing LLM call. On re-entry (after tools)
    /// it skips straight to dispatch.
    async fn orchestrate(&self, state: &mut SessionState) -> Result<Node> {
        let fresh_user_turn = state
            .conversation
            .last()
            .map(|m| m.role == Role::User)
            .unwrap_or(false);

        if fresh_user_turn {
            let user_text = state.conversation.last().map(|m| m.content.clone()).unwrap_or_default();
            let category = classify(&user_text);

            state.task_category = category;
            state.active_agent = match category {
                TaskCategory::Search => ActiveAgent::Search,
                TaskCategory::Playlist => ActiveAgent::Playlist,
                TaskCategory::General => ActiveAgent::Orchestrator,
            };

            tracing::info!(category = %category, "Classified request");

            let system_prompt = format!("{ORCHESTRATOR_PROMPT}{category}");
            let response = reason(
                self.provider.as_ref(),
                &system_prompt,
                &state.conversation,
                &self.no_tools,
                &self.config.generation,
                self.config.window,
            )
            .await?;

            state.conversation.push(response);
        }

        Ok(self.dispatch(state))
    }

    /// Routing function: tool calls pending go to the executor; otherwise
    /// dispatch on the active agent. The orchestrator keeping the request
    /// means its own reply is the final answer.
    fn dispatch(&self, state: &SessionState) -> Node {
        let pending_tools = state
            .conversation
            .last()
            .map(Message::has_tool_calls)
            .unwrap_or(false);

        if pending_tools {
            return Node::Tools;
        }

        match state.active_agent {
            ActiveAgent::Search => Node::SearchAgent,
            ActiveAgent::Playlist => Node::PlaylistAgent,
            ActiveAgent::Orchestrator => Node::End,
        }
    }

    /// A specialized reasoning step over the agent's own tool subset.
    async fn specialist(
        &self,
        state: &mut SessionState,
        prompt: &str,
        tools: &ToolRegistry,
    ) -> Result<Node> {
        let response = reason(
            self.provider.as_ref(),
            prompt,
            &state.conversation,
            tools,
            &self.config.generation,
            self.config.window,
        )
        .await?;

        let has_calls = response.has_tool_calls();
        state.conversation.push(response);

        Ok(if has_calls { Node::Tools } else { Node::End })
    }

    /// The shared tool executor node. Executes the pending calls serialized
    /// and in issue order, appends the results, and always hands control
    /// back to the orchestrator.
    async fn run_tools(&self, state: &mut SessionState) -> Result<Node> {
        let calls = state
            .conversation
            .last()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.tool_calls.clone())
            .unwrap_or_default();

        if calls.is_empty() {
            return Err(AgentError::Session(
                "Tool executor reached with no pending tool calls".into(),
            ));
        }

        let results = self.tools.execute_all(&calls).await;
        for result in &results {
            state
                .conversation
                .push(Message::tool(format_tool_result(result), result.id.clone()));
        }

        Ok(Node::Orchestrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::MockStreamingClient;
    use crate::toolkit::{
        AddTracksToPlaylistTool, CreatePlaylistTool, GetMyPlaylistsTool, GetPlaylistTracksTool,
        SearchSpotifyTool,
    };
    use agent_core::provider::{Completion, CompletionStream, ModelInfo, ProviderInfo};
    use agent_core::tool::{ToolCall, ToolSchema};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed script of completions and records the tool names
    /// bound on every call.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Completion>>,
        bound_tools: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(completions: Vec<Completion>) -> Self {
            Self {
                script: Mutex::new(completions.into()),
                bound_tools: Mutex::new(Vec::new()),
            }
        }

        fn bound(&self) -> Vec<Vec<String>> {
            self.bound_tools.lock().unwrap().clone()
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
                    id: Some(format!("call-{name}")),
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
            tools: &[ToolSchema],
            _options: &GenerationOptions,
        ) -> Result<Completion> {
            self.bound_tools
                .lock()
                .unwrap()
                .push(tools.iter().map(|t| t.name.clone()).collect());

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

    fn full_registry() -> Arc<ToolRegistry> {
        let client = Arc::new(MockStreamingClient::new());
        let mut tools = ToolRegistry::new();
        tools.register(SearchSpotifyTool::new(client.clone()));
        tools.register(CreatePlaylistTool::new(client.clone()));
        tools.register(AddTracksToPlaylistTool::new(client.clone()));
        tools.register(GetMyPlaylistsTool::new(client.clone()));
        tools.register(GetPlaylistTracksTool::new(client));
        Arc::new(tools)
    }

    fn router_with(script: Vec<Completion>) -> (ConciergeRouter, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(script));
        let router = ConciergeRouter::new(
            provider.clone(),
            full_registry(),
            RouterConfig::default(),
        );
        (router, provider)
    }

    #[tokio::test]
    async fn test_general_request_ends_with_orchestrator_reply() {
        let (router, provider) = router_with(vec![ScriptedProvider::answer("Hi! Ask me about music.")]);

        let mut state = SessionState::new();
        state.push_user("hello there");

        let answer = router.run(&mut state).await.unwrap();
        assert_eq!(answer, "Hi! Ask me about music.");
        assert_eq!(state.task_category, TaskCategory::General);
        assert_eq!(state.active_agent, ActiveAgent::Orchestrator);
        // Exactly one LLM call: the orchestrator's
        assert_eq!(provider.bound().len(), 1);
    }

    #[tokio::test]
    async fn test_playlist_request_routes_to_playlist_agent_with_subset() {
        let (router, provider) = router_with(vec![
            // orchestrator routing call
            ScriptedProvider::answer("Routing to the playlist agent."),
            // playlist agent requests a tool
            ScriptedProvider::tool_call(
                "createPlaylist",
                json!({"name": "Rain Songs", "description": "5 songs about rain"}),
            ),
            // after tools -> orchestrate -> playlist agent gives the answer
            ScriptedProvider::answer("Created your playlist 'Rain Songs'."),
        ]);

        let mut state = SessionState::new();
        state.push_user("create a playlist of 5 songs about rain");

        let answer = router.run(&mut state).await.unwrap();
        assert_eq!(answer, "Created your playlist 'Rain Songs'.");
        assert_eq!(state.task_category, TaskCategory::Playlist);
        assert_eq!(state.active_agent, ActiveAgent::Playlist);

        let bound = provider.bound();
        assert_eq!(bound.len(), 3);
        // Orchestrator routes without tools
        assert!(bound[0].is_empty());
        // Playlist agent never sees the search-only tool
        assert!(!bound[1].contains(&"searchSpotify".to_string()));
        assert!(bound[1].contains(&"createPlaylist".to_string()));
        assert!(!bound[2].contains(&"searchSpotify".to_string()));
    }

    #[tokio::test]
    async fn test_search_request_routes_to_search_agent() {
        let (router, provider) = router_with(vec![
            ScriptedProvider::answer("Routing to the search agent."),
            ScriptedProvider::tool_call("searchSpotify", json!({"query": "rain", "limit": 5})),
            ScriptedProvider::answer("Here are some rain songs."),
        ]);

        let mut state = SessionState::new();
        state.push_user("find me a song about rain");

        let answer = router.run(&mut state).await.unwrap();
        assert_eq!(answer, "Here are some rain songs.");
        assert_eq!(state.active_agent, ActiveAgent::Search);

        let bound = provider.bound();
        assert_eq!(bound[1], vec!["searchSpotify".to_string()]);
    }

    #[tokio::test]
    async fn test_tool_results_appended_in_order_then_back_to_reasoning() {
        let (router, _provider) = router_with(vec![
            ScriptedProvider::answer("Routing."),
            ScriptedProvider::tool_call("searchSpotify", json!({"query": "rain", "limit": 3})),
            ScriptedProvider::answer("Done."),
        ]);

        let mut state = SessionState::new();
        state.push_user("find rain tracks");

        router.run(&mut state).await.unwrap();

        let messages = state.conversation.messages();
        // user, orchestrator, assistant(tool call), tool result, assistant(final)
        assert_eq!(messages.len(), 5);
        assert!(messages[2].has_tool_calls());
        assert_eq!(messages[3].role, Role::Tool);
        // Control went back to a reasoning step after tools, never ended on one
        assert_eq!(messages[4].role, Role::Assistant);
        assert!(!messages[4].has_tool_calls());
        // No dangling tool call when control returns to the user
        assert!(!messages.last().unwrap().has_tool_calls());
    }

    #[tokio::test]
    async fn test_unknown_tool_surfaces_error_result_and_run_continues() {
        let (router, _provider) = router_with(vec![
            ScriptedProvider::answer("Routing."),
            ScriptedProvider::tool_call("bogusTool", json!({})),
            ScriptedProvider::answer("That tool was unavailable."),
        ]);

        let mut state = SessionState::new();
        state.push_user("find something");

        let answer = router.run(&mut state).await.unwrap();
        assert_eq!(answer, "That tool was unavailable.");

        let tool_msg = state
            .conversation
            .messages()
            .iter()
            .find(|m| m.role == Role::Tool)
            .unwrap();
        assert!(tool_msg.content.contains("failed"));
        assert!(tool_msg.content.contains("Tool not found"));
    }

    #[tokio::test]
    async fn test_quoted_numeric_limit_is_normalized_before_execution() {
        let (router, _provider) = router_with(vec![
            ScriptedProvider::answer("Routing."),
            // Model violated the numeric rule: limit as a quoted string
            ScriptedProvider::tool_call("searchSpotify", json!({"query": "rain", "limit": "3"})),
            ScriptedProvider::answer("Found them."),
        ]);

        let mut state = SessionState::new();
        state.push_user("find rain tracks");

        router.run(&mut state).await.unwrap();

        let tool_msg = state
            .conversation
            .messages()
            .iter()
            .find(|m| m.role == Role::Tool)
            .unwrap();
        // Normalized and executed, not rejected
        assert!(tool_msg.content.contains("returned"));
    }

    #[tokio::test]
    async fn test_step_bound_stops_perpetual_tool_requests() {
        let mut script = vec![ScriptedProvider::answer("Routing.")];
        for _ in 0..20 {
            script.push(ScriptedProvider::tool_call(
                "getMyPlaylists",
                json!({}),
            ));
        }
        let (router, _provider) = router_with(script);

        let mut state = SessionState::new();
        state.push_user("create a playlist forever");

        let result = router.run(&mut state).await;
        assert!(matches!(result, Err(AgentError::MaxIterations(_))));
    }
}
