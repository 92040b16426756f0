//! HTTP API server implementation

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::core::client::Translator;
use crate::core::errors::TranslationError;
use crate::core::models::{TranslationRequest, TranslationResponse};

/// Application state
#[derive(Clone)]
pub struct AppState {
    translator: Arc<Translator>,
}

/// Service banner
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// `reachable` or `unreachable`
    pub backend: String,
    pub model: String,
    /// Whether the configured model is installed, when the backend is up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_available: Option<bool>,
    pub version: String,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, code: &str, kind: &str) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                code: code.to_string(),
                kind: kind.to_string(),
            },
        }
    }
}

impl IntoResponse for TranslationError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            TranslationError::InvalidInput { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_request_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        };

        let body = ErrorResponse::new(self.to_string(), self.code(), kind);
        (status, Json(body)).into_response()
    }
}

/// OpenAPI document
#[derive(OpenApi)]
#[openapi(
    info(title = "Japanese to Korean Translator", description = "Translate Japanese text to Korean using a local LLM"),
    paths(translate, health_check),
    components(schemas(TranslationRequest, TranslationResponse, HealthResponse, ErrorResponse, ErrorDetail))
)]
pub struct ApiDoc;

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Backend reachable", body = HealthResponse),
        (status = 503, description = "Backend unreachable", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let backend = state.translator.health().await;
    let model = state.translator.config().model.clone();

    let (code, status) = if backend.reachable {
        (StatusCode::OK, "healthy")
    } else {
        warn!("Health check: backend unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = HealthResponse {
        status: status.to_string(),
        backend: if backend.reachable { "reachable" } else { "unreachable" }.to_string(),
        model_available: backend.has_model(&model),
        model,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (code, Json(body))
}

/// Translation handler
#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslationRequest,
    responses(
        (status = 200, description = "Cleaned Korean translation", body = TranslationResponse),
        (status = 400, description = "Empty or malformed request", body = ErrorResponse),
        (status = 500, description = "Backend failure or empty result", body = ErrorResponse)
    )
)]
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    rejection.body_text(),
                    "invalid_request",
                    "invalid_request_error",
                )),
            )
                .into_response();
        }
    };

    match state
        .translator
        .translate_with_model(&payload.japanese_text, payload.model.as_deref())
        .await
    {
        Ok(result) => {
            let raw_backend_output = state
                .translator
                .config()
                .include_raw_output
                .then_some(result.raw_output);

            Json(TranslationResponse {
                translated_text: result.translation,
                model_used: result.model_used,
                raw_backend_output,
            })
            .into_response()
        }
        Err(e) => {
            match &e {
                TranslationError::InvalidInput { .. } => warn!("Rejected request: {}", e),
                _ => error!("Translation failed: {}", e),
            }
            e.into_response()
        }
    }
}

/// Build the router over a translator
pub fn router(translator: Arc<Translator>) -> Router {
    let state = Arc::new(AppState { translator });

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/translate", post(translate))
        .route("/openapi.json", get(openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16, translator: Translator) -> anyhow::Result<()> {
    let app = router(Arc::new(translator));

    // Bind address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
