//! Request counter and latency histogram.
//!
//! - **`requests_total`**: counter with labels `status`, `method`, `handler`
//! - **`request_duration_seconds`**: histogram with labels `method`, `handler`
//!
//! Both are prefixed with the configured namespace and subsystem, so the
//! defaults expose `echo_http_requests_total` and
//! `echo_http_request_duration_seconds`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};
use tracing::{info, trace};

use super::config::MetricsConfig;
use super::registry::MetricsRegistry;
use super::request::RequestInfo;
use super::status::status_label;
use crate::shared::errors::MetricsError;

pub const REQUESTS_TOTAL: &str = "requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "request_duration_seconds";

/// Route label for requests served by the router fallback. Keeps
/// arbitrary unmatched paths from each creating a series.
pub const NOT_FOUND_ROUTE: &str = "/not-found";

/// Registered request instruments plus the configuration that labels them.
///
/// Cheap to clone; every clone records into the same instruments.
#[derive(Clone)]
pub struct RequestMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    config: MetricsConfig,
    requests: IntCounterVec,
    duration: HistogramVec,
}

impl RequestMetrics {
    /// Register the instruments with the default configuration.
    pub fn new(registry: &MetricsRegistry) -> Result<Self, MetricsError> {
        Self::with_config(MetricsConfig::default(), registry)
    }

    /// Register the instruments described by `config`.
    ///
    /// Fails if either metric name is already taken in `registry` or the
    /// bucket schedule is not strictly increasing. An empty schedule falls
    /// back to the `prometheus` crate defaults. Nothing stays registered on
    /// failure.
    pub fn with_config(
        config: MetricsConfig,
        registry: &MetricsRegistry,
    ) -> Result<Self, MetricsError> {
        if !config.buckets.windows(2).all(|w| w[0] < w[1]) {
            return Err(MetricsError::InvalidBuckets(config.buckets.clone()));
        }

        let requests = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Number of HTTP operations")
                .namespace(config.namespace.clone())
                .subsystem(config.subsystem.clone()),
            &["status", "method", "handler"],
        )?;

        let duration = HistogramVec::new(
            HistogramOpts::new(REQUEST_DURATION_SECONDS, "Spend time by processing a route")
                .namespace(config.namespace.clone())
                .subsystem(config.subsystem.clone())
                .buckets(config.buckets.clone()),
            &["method", "handler"],
        )?;

        registry.register(requests.clone())?;
        if let Err(e) = registry.register(duration.clone()) {
            let _ = registry.unregister(requests.clone());
            return Err(e);
        }

        info!(
            namespace = %config.namespace,
            subsystem = %config.subsystem,
            buckets = config.buckets.len(),
            normalize_http_status = config.normalize_http_status,
            "Request metrics registered"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                requests,
                duration,
            }),
        })
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.inner.config
    }

    /// `handler` label for a request. Unrouted requests always get
    /// [`NOT_FOUND_ROUTE`], whatever the label function returns.
    pub fn route_label(&self, info: &RequestInfo) -> String {
        let label = (self.inner.config.handler_label)(info);
        if info.route_not_found {
            return NOT_FOUND_ROUTE.to_string();
        }
        label
    }

    pub fn should_skip(&self, info: &RequestInfo, status: StatusCode) -> bool {
        (self.inner.config.skipper)(info, status)
    }

    /// Observe one completed request.
    pub fn record(&self, method: &Method, route: &str, status: StatusCode, elapsed: Duration) {
        let method = method.as_str();
        let status = status_label(status, self.inner.config.normalize_http_status);

        self.inner
            .duration
            .with_label_values(&[method, route])
            .observe(elapsed.as_secs_f64());
        self.inner
            .requests
            .with_label_values(&[&*status, method, route])
            .inc();

        trace!(
            method,
            route,
            status = %status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request recorded"
        );
    }

    pub fn requests_total(&self) -> &IntCounterVec {
        &self.inner.requests
    }

    pub fn request_duration(&self) -> &HistogramVec {
        &self.inner.duration
    }
}
