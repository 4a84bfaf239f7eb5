//! HTTP API gateway for calagent.
//!
//! Exposes the chat endpoint used by the web frontend, plus a liveness
//! banner, a health check and the tool listing.
//!
//! Built on Axum for high performance async HTTP.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, header},
    response::Json,
    routing::{get, post},
};
use calagent_agent::{ReactLoop, SessionOrchestrator};
use calagent_config::AppConfig;
use calagent_core::message::SessionId;
use calagent_memory::InMemorySessionStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: SessionOrchestrator,
    pub start_time: DateTime<Utc>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(orchestrator: SessionOrchestrator) -> Self {
        Self {
            orchestrator,
            start_time: Utc::now(),
        }
    }
}

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS limited to the configured origins
/// - Request body size limit (64 KB)
/// - HTTP trace logging
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/tools", get(tools_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Wire provider, calendar tools, session store and ReAct loop from config.
pub fn orchestrator_from_config(
    config: &AppConfig,
) -> Result<SessionOrchestrator, calagent_core::Error> {
    let router = calagent_providers::router::build_from_config(config);
    let provider = router
        .default()
        .ok_or_else(|| calagent_core::Error::Config {
            message: format!("provider '{}' is not configured", config.default_provider),
        })?;

    if !config.has_api_key() {
        warn!("No API key configured; model calls will likely be rejected");
    }

    let tools = Arc::new(calagent_tools::registry_from_config(config));
    let agent = Arc::new(ReactLoop::from_config(provider, tools, config));
    Ok(SessionOrchestrator::new(
        agent,
        Arc::new(InMemorySessionStore::new()),
    ))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let orchestrator = orchestrator_from_config(&config)?;
    let state = Arc::new(GatewayState::new(orchestrator));
    let app = build_router(state, &config.gateway.allowed_origins);

    info!(
        addr = %addr,
        provider = %config.default_provider,
        model = %config.default_model,
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    status: &'static str,
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "Backend is running",
        message: "Calendar AI API backend is live!",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
    uptime_secs: i64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.orchestrator.store().count().await,
        uptime_secs: (Utc::now() - state.start_time).num_seconds(),
    })
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize)]
struct ToolsResponse {
    tools: Vec<ToolInfo>,
}

async fn tools_handler(State(state): State<SharedState>) -> Json<ToolsResponse> {
    let tools = state
        .orchestrator
        .agent()
        .tools()
        .descriptors()
        .into_iter()
        .map(|d| ToolInfo {
            parameters: d.input_schema.to_json_schema(),
            name: d.name,
            description: d.description,
        })
        .collect();
    Json(ToolsResponse { tools })
}

#[derive(Deserialize)]
struct ChatRequest {
    session_id: String,
    prompt: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let session_id = SessionId(req.session_id);
    info!(session_id = %session_id, "Chat request");

    let response = state
        .orchestrator
        .handle_turn(&session_id, &req.prompt)
        .await;

    Json(ChatResponse { response })
}
