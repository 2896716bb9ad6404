//! HTTP/WebSocket Handlers

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use agent_core::{
    message::Conversation,
    provider::GenerationOptions,
    reasoning::{Agent, AgentConfig},
    session::{Session, SessionId, SessionStore},
    AgentError,
};
use music_concierge::{
    prompts::CONCIERGE_PROMPT, ActiveAgent, ConciergeRouter, RouterConfig, SessionState,
    TaskCategory,
};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
    pub tool_count: usize,
}

/// One entry of the `input` message list
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// New message turns to append to the session log
    pub input: Vec<IncomingMessage>,

    /// Thread key; omitted means a fresh session
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,
}

/// Final routing-graph state surfaced to the caller
#[derive(Debug, Serialize)]
pub struct GraphState {
    pub messages: Vec<agent_core::Message>,
    pub task_category: TaskCategory,
    pub active_agent: ActiveAgent,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: GraphState,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub message: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn agent_error(e: AgentError) -> ApiError {
    tracing::error!("Agent error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.user_message(),
            code: "AGENT_ERROR".into(),
        }),
    )
}

fn timeout_error() -> ApiError {
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ErrorResponse {
            error: "The request timed out. Please try again.".into(),
            code: "RUN_TIMEOUT".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
        tool_count: state.tools.len(),
    })
}

/// List available models
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<agent_core::provider::ModelInfo>>, ApiError> {
    let models = state.provider.list_models().await.map_err(agent_error)?;
    Ok(Json(models))
}

/// Multi-agent chat endpoint.
///
/// Appends the incoming turns to the session's log, runs the routing graph
/// under the configured wall-clock budget, and returns the final graph state.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session_id = payload
        .session_id
        .map(SessionId::from_string)
        .unwrap_or_default();

    let mut session = state
        .sessions
        .load(&session_id)
        .map_err(agent_error)?
        .unwrap_or_else(|| Session::with_id(session_id.clone()));

    for incoming in &payload.input {
        let message = match incoming.role.as_str() {
            "assistant" => agent_core::Message::assistant(&incoming.content),
            _ => agent_core::Message::user(&incoming.content),
        };
        session.conversation.push(message);
    }

    let mut graph_state = SessionState::from_conversation(session.conversation.clone());

    let router = ConciergeRouter::new(
        state.provider.clone(),
        state.tools.clone(),
        RouterConfig {
            max_steps: state.config.max_steps,
            window: state.config.window,
            generation: GenerationOptions {
                model: payload.model.unwrap_or_else(|| state.config.model.clone()),
                ..Default::default()
            },
        },
    );

    let run = tokio::time::timeout(state.config.run_timeout, router.run(&mut graph_state));

    match run.await {
        Ok(Ok(_answer)) => {}
        Ok(Err(e)) => return Err(agent_error(e)),
        Err(_elapsed) => {
            tracing::warn!(session = %session_id, "Run exceeded wall-clock budget");
            return Err(timeout_error());
        }
    }

    session.conversation = graph_state.conversation.clone();
    session.touch();
    state.sessions.save(&session).map_err(agent_error)?;

    Ok(Json(ChatResponse {
        response: GraphState {
            messages: graph_state.conversation.messages().to_vec(),
            task_category: graph_state.task_category,
            active_agent: graph_state.active_agent,
        },
        session_id: session_id.to_string(),
    }))
}

/// Single-agent endpoint: the full tool catalog behind one ReAct loop.
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let model = payload.model.unwrap_or_else(|| state.config.model.clone());

    let config = AgentConfig {
        system_prompt: CONCIERGE_PROMPT.into(),
        max_iterations: state.config.max_steps,
        window: state.config.window,
        deadline: Some(state.config.run_timeout),
        generation: GenerationOptions {
            model: model.clone(),
            ..Default::default()
        },
    };

    let agent = Agent::new(state.provider.clone(), state.tools.clone(), config);

    let run = tokio::time::timeout(state.config.run_timeout, agent.ask(&payload.message));

    let message = match run.await {
        Ok(result) => result.map_err(agent_error)?,
        Err(_elapsed) => return Err(timeout_error()),
    };

    Ok(Json(AskResponse { message, model }))
}

/// WebSocket streaming chat (text only, no tool calls)
pub async fn chat_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => continue,
        };

        // Parse request
        let request: AskRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        let model = request.model.unwrap_or_else(|| state.config.model.clone());
        let mut conversation = Conversation::with_system_prompt(CONCIERGE_PROMPT);
        conversation.push(agent_core::Message::user(request.message));

        let options = GenerationOptions {
            model: model.clone(),
            ..Default::default()
        };

        // Stream response
        match state
            .provider
            .complete_stream(conversation.messages(), &options)
            .await
        {
            Ok(mut stream) => {
                while let Some(result) = stream.next().await {
                    match result {
                        Ok(chunk) => {
                            let response = serde_json::json!({
                                "type": "chunk",
                                "content": chunk.delta,
                                "done": chunk.done,
                            });
                            if sender
                                .send(Message::Text(response.to_string().into()))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        Err(e) => {
                            let error =
                                serde_json::json!({"type": "error", "error": e.to_string()});
                            let _ = sender.send(Message::Text(error.to_string().into())).await;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
            }
        }
    }
}
