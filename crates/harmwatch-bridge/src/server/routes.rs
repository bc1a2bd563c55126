use crate::server::BridgeAppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use harmwatch_classifiers::extract_domains;
use harmwatch_core::{Error, IngestRequest};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

// ============================================================================
// Health endpoints
// ============================================================================

pub async fn health(State(state): State<BridgeAppState>) -> impl IntoResponse {
    Json(state.hub.health())
}

// ============================================================================
// Ingestion
// ============================================================================

/// Accept one producer event and fan it out to every subscriber.
///
/// The ingest runs on its own task, so a producer that hangs up mid-request
/// cannot drop a broadcast while it holds the registry lock.
pub async fn ingest(
    State(state): State<BridgeAppState>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        metrics::counter!("harmwatch_events_rejected_total").increment(1);
        warn!(error = %rejection.body_text(), "Rejected unreadable event");
        AppError::InvalidEvent(rejection.body_text())
    })?;

    let hub = state.hub.clone();
    tokio::spawn(async move { hub.ingest(req).await })
        .await
        .map_err(|e| AppError::Internal(format!("ingest task failed: {}", e)))??;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub text: String,

    /// Domains to check; taken from the text when omitted
    #[serde(default)]
    pub domains: Option<Vec<String>>,
}

/// Classify text without broadcasting it
pub async fn classify(
    State(state): State<BridgeAppState>,
    Json(req): Json<ClassifyRequest>,
) -> impl IntoResponse {
    let domains = req.domains.unwrap_or_else(|| extract_domains(&req.text));
    Json(state.classifier().classify(&req.text, &domains))
}

// ============================================================================
// Statistics
// ============================================================================

pub async fn stats(State(state): State<BridgeAppState>) -> impl IntoResponse {
    Json(state.hub.stats())
}

pub async fn metrics(State(state): State<BridgeAppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "ok": false,
            "error": {
                "message": format!("no route for {}", uri.path()),
                "type": "not_found",
            }
        })),
    )
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    InvalidEvent(String),
    Internal(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        if err.is_producer_facing() {
            AppError::InvalidEvent(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            AppError::InvalidEvent(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg, "invalid_event")
            }
            AppError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "internal_error")
            }
        };

        let body = json!({
            "ok": false,
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
