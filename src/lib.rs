//! # route-metrics
//!
//! Prometheus request metrics for axum: a counter of completed requests and
//! a latency histogram per method and route pattern.
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use route_metrics::{track_request_metrics, MetricsConfig, MetricsRegistry, RequestMetrics};
//!
//! # fn build() -> Result<Router, route_metrics::MetricsError> {
//! let registry = MetricsRegistry::new();
//! let metrics = RequestMetrics::with_config(
//!     MetricsConfig::default().with_skipper(|info, _| info.route() == "/healthz"),
//!     &registry,
//! )?;
//!
//! let app = Router::new()
//!     .route("/users/{id}", get(|| async { "user" }))
//!     .route("/healthz", get(|| async { "ok" }))
//!     .layer(middleware::from_fn_with_state(metrics, track_request_metrics));
//! # Ok(app)
//! # }
//! ```
//!
//! ## Layout
//!
//! - **metrics**: configuration, registry, instruments and status labels
//! - **interfaces**: axum middleware, scrape endpoint and demo routes
//! - **config**: TOML configuration for the server binary
//! - **server**: server lifecycle and tracing setup
//! - **shared**: errors and shutdown signalling

pub mod config;
pub mod interfaces;
pub mod metrics;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, MetricsSettings};

pub use metrics::{
    default_handler_label, default_skipper, normalize_http_status, MetricsConfig,
    MetricsRegistry, RequestInfo, RequestMetrics, DEFAULT_BUCKETS, NOT_FOUND_ROUTE,
};

// Re-export middleware and scrape handler
pub use interfaces::http::modules::metrics::{prometheus_metrics, track_request_metrics, MetricsState};

pub use shared::errors::{AppError, ConfigError, MetricsError};
