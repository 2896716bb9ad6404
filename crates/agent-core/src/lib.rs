//! # agent-core
//!
//! Provider-agnostic agent framework: conversation log, tool system, and the
//! reasoning control loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tool     │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reasoning loop alternates between one `LlmProvider` completion and the
//! serialized execution of whatever tool calls the completion requested,
//! until a completion arrives with no tool calls (the final answer) or the
//! configured iteration bound is hit.
//!
//! The `LlmProvider` trait enables swapping between Ollama, OpenAI, Anthropic,
//! or any other provider without changing agent logic.

pub mod provider;
pub mod tool;
pub mod reasoning;
pub mod message;
pub mod error;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::Agent;
pub use session::Session;
pub use tool::{Tool, ToolCall, ToolResult, ToolRegistry, ToolSchema};
