//! HTTP request metrics middleware
//!
//! Records `requests_total` (counter) and `request_duration_seconds`
//! (histogram) for every request passing through the router, unless the
//! configured skipper excludes it.

use std::time::Instant;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::warn;

use crate::metrics::{RequestInfo, RequestMetrics};

/// Middleware for `axum::middleware::from_fn_with_state`.
///
/// Install it with `Router::layer` after the routes and the fallback are
/// added. Route patterns are only visible to layers applied that way;
/// wrapping the finished router from outside labels everything as
/// `/not-found`.
///
/// - **`requests_total`**: labels `status`, `method`, `handler`
/// - **`request_duration_seconds`**: labels `method`, `handler`
///
/// The skipper runs after the handler, so skipped requests are still timed
/// and still pass through error rendering; only recording is dropped.
pub async fn track_request_metrics(
    State(metrics): State<RequestMetrics>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let info = RequestInfo::from_request(&request);
    let route = metrics.route_label(&info);

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status();
    if status.is_server_error() {
        warn!(
            method = %info.method,
            route = %route,
            status = status.as_u16(),
            "Handler failed"
        );
    }

    if metrics.should_skip(&info, status) {
        return response;
    }

    metrics.record(&info.method, &route, status, elapsed);

    response
}

// ── Tests ──────────────────────────────────────────────────────
