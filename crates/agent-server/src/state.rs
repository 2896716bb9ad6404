//! Application State

use std::sync::Arc;

use agent_core::{session::MemorySessionStore, LlmProvider, ToolRegistry};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, etc.)
    pub provider: Arc<dyn LlmProvider>,

    /// Tool registry with all available tools
    pub tools: Arc<ToolRegistry>,

    /// Per-thread session store
    pub sessions: Arc<MemorySessionStore>,

    /// Server configuration
    pub config: Arc<ServerConfig>,
}
