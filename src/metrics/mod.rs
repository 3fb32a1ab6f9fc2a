//! Request metrics core
//!
//! - `config`: middleware configuration and its defaults
//! - `request`: the request view seen by label functions and skippers
//! - `status`: status code labels
//! - `registry`: explicit Prometheus registry
//! - `recorder`: the counter/histogram pair and how a request is recorded

pub mod config;
pub mod recorder;
pub mod registry;
pub mod request;
pub mod status;

pub use config::{
    default_handler_label, default_skipper, HandlerLabelFn, MetricsConfig, Skipper,
    DEFAULT_BUCKETS,
};
pub use recorder::{RequestMetrics, NOT_FOUND_ROUTE, REQUESTS_TOTAL, REQUEST_DURATION_SECONDS};
pub use registry::MetricsRegistry;
pub use request::RequestInfo;
pub use status::{normalize_http_status, status_label};
