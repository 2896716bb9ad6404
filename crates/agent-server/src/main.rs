//! Music Concierge HTTP Server
//!
//! Axum-based server exposing the multi-agent router on `POST /chat`, the
//! single-agent loop on `POST /api/ask`, and WebSocket text streaming.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use agent_core::LlmProvider;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{session::MemorySessionStore, ToolRegistry};
use agent_runtime::OllamaProvider;

use music_concierge::{
    streaming::MockStreamingClient,
    tools::{
        AddTracksToPlaylistTool, CreatePlaylistTool, GetMyPlaylistsTool, GetPlaylistTracksTool,
        SearchSpotifyTool, WeatherTool, WebSearchTool,
    },
    weather::MockWeatherClient,
    websearch::MockWebSearchClient,
};

use crate::config::ServerConfig;
use crate::handlers::{
    ask_handler, chat_handler, chat_stream_handler, health_check, list_models,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Configuration errors are fatal: refuse to start half-configured
    let config = Arc::new(ServerConfig::from_env()?);

    // Initialize LLM provider
    let provider = Arc::new(OllamaProvider::from_env());

    // Verify provider connection
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - agent will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Initialize tool clients
    let streaming = Arc::new(MockStreamingClient::new());
    let websearch = Arc::new(MockWebSearchClient);
    let weather = Arc::new(MockWeatherClient);

    // Register tools; the registry is read-only from here on
    let mut tools = ToolRegistry::new();
    tools.register(SearchSpotifyTool::new(streaming.clone()));
    tools.register(CreatePlaylistTool::new(streaming.clone()));
    tools.register(AddTracksToPlaylistTool::new(streaming.clone()));
    tools.register(GetMyPlaylistsTool::new(streaming.clone()));
    tools.register(GetPlaylistTracksTool::new(streaming));
    tools.register(WebSearchTool::new(websearch));
    tools.register(WeatherTool::new(weather));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Build application state
    let state = AppState {
        provider,
        tools: Arc::new(tools),
        sessions: Arc::new(MemorySessionStore::new()),
        config: config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        // Agent API
        .route("/chat", post(chat_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/chat/stream", get(chat_stream_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🎵 music-concierge server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/models      - List available models");
    tracing::info!("  POST /chat            - Multi-agent chat");
    tracing::info!("  POST /api/ask         - Single-agent chat");
    tracing::info!("  GET  /api/chat/stream - WebSocket streaming");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
