//! Per-request view handed to label functions and skippers.

use axum::extract::MatchedPath;
use axum::http::{Method, Request, Uri};

/// What the middleware knows about a request before it runs the next
/// handler.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    /// Route pattern the router matched, e.g. `/users/{id}`.
    pub matched_path: Option<String>,
    /// Set when the router dispatched the request to its fallback.
    pub route_not_found: bool,
}

impl RequestInfo {
    /// Capture method, URI and route resolution from an axum request.
    ///
    /// axum inserts [`MatchedPath`] for every matched route before the
    /// route's layers run, and never for the fallback, so a missing
    /// extension marks the request as unrouted. This only holds when the
    /// metrics middleware is installed with `Router::layer`.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let matched_path = request
            .extensions()
            .get::<MatchedPath>()
            .map(|mp| mp.as_str().to_string());

        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            route_not_found: matched_path.is_none(),
            matched_path,
        }
    }

    /// Raw request path.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Matched route pattern, or the raw path when nothing matched.
    pub fn route(&self) -> &str {
        self.matched_path.as_deref().unwrap_or_else(|| self.uri.path())
    }
}
