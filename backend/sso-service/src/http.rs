/// HTTP endpoints for probes and scraping
///
/// - `/health`: liveness, always OK while the process serves
/// - `/metrics`: Prometheus text exposition
use crate::metrics;
use anyhow::{Context, Result};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tracing::{error, info};

/// Build the HTTP router
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> Response {
    match metrics::gather_text() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!("failed to encode metrics: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Serve the router until `shutdown` resolves
pub async fn serve<F>(addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

    info!("Starting HTTP server on {}", addr);

    axum::serve(listener, build_router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
