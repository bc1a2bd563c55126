use crate::config::BridgeConfig;
use crate::server::{routes, websocket, BridgeAppState};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use harmwatch_classifiers::RuleClassifier;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the Axum application
pub fn build_app(state: BridgeAppState) -> Router {
    // CORS defaults to local dashboard origins
    let cors = if state.config.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(routes::health))
        .route("/ingest", post(routes::ingest))
        .route("/classify", post(routes::classify))
        .route("/stats", get(routes::stats))
        .route("/metrics", get(routes::metrics))
        .route("/stream", get(websocket::stream_handler))
        .fallback(routes::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run_server(
    config: BridgeConfig,
    metrics_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let classifier = Arc::new(RuleClassifier::new()?);

    let mut state = BridgeAppState::new(config, classifier);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HarmWatch bridge listening on http://{}", addr);
    info!("Subscribers connect to ws://{}/stream", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
