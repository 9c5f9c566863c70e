//! HTTP API server for integration with other systems.
//!
//! `POST /generate` turns `{script, vibe}` into an MP4 response.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::ReelError;
use crate::orchestrator::Orchestrator;
use crate::request::{GenerationRequest, RawRequest};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
pub struct AppState {
    orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    preflight::check(Operation::Serve, &settings)?;

    let host = host.unwrap_or(&settings.server.host).to_string();
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState::new(Orchestrator::new(settings)?));
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Reelsmith API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Generate", "POST /generate  {\"script\", \"vibe\"}");
    Output::kv("Generate (JSON)", "POST /generate?encoding=base64");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate).fallback(method_not_allowed))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Debug, Default, Deserialize)]
struct GenerateParams {
    /// `base64` returns a JSON envelope instead of raw bytes.
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: String,
}

fn error_response(status: StatusCode, error: String, kind: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            kind: kind.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ReelError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error_response(status, self.to_string(), self.kind())
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed".to_string(),
        "method_not_allowed",
    )
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
    body: Result<Json<RawRequest>, JsonRejection>,
) -> Response {
    let Json(raw) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
                "invalid_request",
            )
        }
    };

    let request = match GenerationRequest::try_from(raw) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match state.orchestrator.assemble(&request).await {
        Ok(artifact) if params.encoding.as_deref() == Some("base64") => {
            Json(artifact.encoded()).into_response()
        }
        Ok(artifact) => {
            info!("Serving {} byte video", artifact.len());
            let disposition = artifact.content_disposition();
            (
                [
                    (header::CONTENT_TYPE, artifact.content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                artifact.bytes,
            )
                .into_response()
        }
        Err(e) => {
            warn!(kind = e.kind(), "Request failed: {}", e);
            e.into_response()
        }
    }
}
