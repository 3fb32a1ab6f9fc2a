//! Middleware configuration.

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use super::request::RequestInfo;

/// Derives the `handler` label from a request.
pub type HandlerLabelFn = Arc<dyn Fn(&RequestInfo) -> String + Send + Sync>;

/// Returns `true` for requests that must not be recorded. Runs after the
/// next handler, so the response status is available.
pub type Skipper = Arc<dyn Fn(&RequestInfo, StatusCode) -> bool + Send + Sync>;

/// Latency buckets in seconds, 0.5ms to 30s.
pub const DEFAULT_BUCKETS: [f64; 17] = [
    0.0005, 0.001, // 1ms
    0.002, 0.005, 0.01, // 10ms
    0.02, 0.05, 0.1, // 100ms
    0.2, 0.5, 1.0, // 1s
    2.0, 5.0, 10.0, // 10s
    15.0, 20.0, 30.0,
];

pub const DEFAULT_NAMESPACE: &str = "echo";
pub const DEFAULT_SUBSYSTEM: &str = "http";

/// Labels a request with its matched route pattern.
pub fn default_handler_label(info: &RequestInfo) -> String {
    info.route().to_string()
}

/// Never skips.
pub fn default_skipper(_info: &RequestInfo, _status: StatusCode) -> bool {
    false
}

/// Configuration for [`RequestMetrics`](super::RequestMetrics).
#[derive(Clone)]
pub struct MetricsConfig {
    pub handler_label: HandlerLabelFn,
    pub skipper: Skipper,
    pub namespace: String,
    pub subsystem: String,
    pub buckets: Vec<f64>,
    /// Record `2xx`-style classes instead of exact codes.
    pub normalize_http_status: bool,
}

impl MetricsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestInfo) -> String + Send + Sync + 'static,
    {
        self.handler_label = Arc::new(f);
        self
    }

    pub fn with_skipper<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestInfo, StatusCode) -> bool + Send + Sync + 'static,
    {
        self.skipper = Arc::new(f);
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    pub fn with_buckets(mut self, buckets: impl Into<Vec<f64>>) -> Self {
        self.buckets = buckets.into();
        self
    }

    pub fn with_normalize_http_status(mut self, normalize: bool) -> Self {
        self.normalize_http_status = normalize;
        self
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            handler_label: Arc::new(default_handler_label),
            skipper: Arc::new(default_skipper),
            namespace: DEFAULT_NAMESPACE.to_string(),
            subsystem: DEFAULT_SUBSYSTEM.to_string(),
            buckets: DEFAULT_BUCKETS.to_vec(),
            normalize_http_status: true,
        }
    }
}

impl fmt::Debug for MetricsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsConfig")
            .field("namespace", &self.namespace)
            .field("subsystem", &self.subsystem)
            .field("buckets", &self.buckets)
            .field("normalize_http_status", &self.normalize_http_status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Uri};

    fn info(path: &'static str, matched: Option<&str>) -> RequestInfo {
        RequestInfo {
            method: Method::GET,
            uri: Uri::from_static(path),
            matched_path: matched.map(str::to_string),
            route_not_found: matched.is_none(),
        }
    }

    #[test]
    fn defaults() {
        let config = MetricsConfig::default();
        assert_eq!(config.namespace, "echo");
        assert_eq!(config.subsystem, "http");
        assert!(config.normalize_http_status);
        assert_eq!(config.buckets.len(), 17);
        assert_eq!(config.buckets.first(), Some(&0.0005));
        assert_eq!(config.buckets.last(), Some(&30.0));
        assert!(config.buckets.windows(2).all(|w| w[0] < w[1]));

        let req = info("/users/7", Some("/users/{id}"));
        assert!(!(config.skipper)(&req, StatusCode::OK));
        assert_eq!((config.handler_label)(&req), "/users/{id}");
    }

    #[test]
    fn builder_overrides() {
        let config = MetricsConfig::new()
            .with_namespace("shop")
            .with_subsystem("api")
            .with_buckets([0.1, 1.0])
            .with_normalize_http_status(false)
            .with_handler_label(|info| info.path().to_uppercase())
            .with_skipper(|info, _| info.path() == "/healthz");

        assert_eq!(config.namespace, "shop");
        assert_eq!(config.subsystem, "api");
        assert_eq!(config.buckets, vec![0.1, 1.0]);
        assert!(!config.normalize_http_status);
        assert_eq!((config.handler_label)(&info("/abc", None)), "/ABC");
        assert!((config.skipper)(&info("/healthz", None), StatusCode::OK));
        assert!(!(config.skipper)(&info("/users", None), StatusCode::OK));
    }

    #[test]
    fn debug_omits_closures() {
        let rendered = format!("{:?}", MetricsConfig::default());
        assert!(rendered.contains("namespace: \"echo\""));
        assert!(rendered.contains(".."));
    }
}
