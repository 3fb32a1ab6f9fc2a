//! Prometheus metrics handler
//!
//! Exposes the scrape endpoint returning Prometheus text format rendered
//! from the application's [`MetricsRegistry`].

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::metrics::MetricsRegistry;

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub registry: MetricsRegistry,
}

/// `GET /metrics`: Prometheus scrape endpoint (no auth)
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> Response {
    match state.registry.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, state.registry.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render metrics").into_response()
        }
    }
}
