//! HTTP API gateway for Praias.
//!
//! Exposes a health check and the v1 chat API over the shared
//! [`ChatPipeline`]. Built on Axum.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::{Router, http::HeaderValue, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use praias_agent::ChatPipeline;
use praias_knowledge::KnowledgeRetriever;

/// Build the full router: `/health` plus the v1 API under `/v1`.
///
/// Layers applied:
/// - CORS, limited to `allowed_origins` (empty = same-origin only)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(api_state: api_v1::SharedApiState, allowed_origins: &[String]) -> Router {
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
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(api_state))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Build the shared pipeline from configuration.
///
/// The registry and retriever are created once here and shared by every
/// request.
pub fn build_pipeline(config: &praias_config::AppConfig) -> Arc<ChatPipeline> {
    let registry = Arc::new(praias_providers::build_from_config(config));
    let retriever = Arc::new(KnowledgeRetriever::from_config(config));
    Arc::new(ChatPipeline::from_config(config, registry, retriever))
}

/// Start the gateway HTTP server.
pub async fn start(config: praias_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    if !config.aws.has_credentials() {
        warn!("AWS credentials not configured, model calls will fail");
    }
    if !config.has_knowledge_base() {
        warn!("No knowledge base configured, answers will not use retrieved context");
    }

    let api_state = Arc::new(api_v1::ApiV1State {
        pipeline: build_pipeline(&config),
    });
    let app = build_router(api_state, &config.gateway.allowed_origins);

    info!(addr = %addr, region = %config.aws.region, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
