//! API router

use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use super::common::ApiResponse;
use super::modules::{health, metrics, users};
use crate::metrics::{MetricsRegistry, RequestMetrics};

pub const HEALTH_ROUTE: &str = "/healthz";
pub const USER_ROUTE: &str = "/users/{id}";

/// Build the application router.
///
/// The request metrics layer wraps every route, the scrape endpoint and
/// the fallback; whether a request is recorded is up to the skipper in
/// `request_metrics`'s configuration.
///
/// Panics if `metrics_endpoint` is not a valid route or collides with one
/// of the built-in routes; [`AppConfig::validate`] rejects such endpoints.
///
/// [`AppConfig::validate`]: crate::config::AppConfig::validate
pub fn create_api_router(
    request_metrics: RequestMetrics,
    registry: MetricsRegistry,
    metrics_endpoint: &str,
) -> Router {
    let health_routes = Router::new()
        .route(HEALTH_ROUTE, get(health::health_check))
        .with_state(health::HealthState::new());

    let user_routes = Router::new()
        .route(USER_ROUTE, get(users::get_user))
        .with_state(users::UserHandlerState::seeded());

    let metrics_routes = Router::new()
        .route(metrics_endpoint, get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState { registry });

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(metrics_routes)
        .fallback(route_not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(
            request_metrics,
            metrics::track_request_metrics,
        ))
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Route not found")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use tower::Service;

    use crate::metrics::MetricsConfig;

    async fn send(app: &Router, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let mut svc = app.clone().into_service();
        svc.call(req).await.unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn app_with(config: MetricsConfig) -> Router {
        let registry = MetricsRegistry::new();
        let request_metrics = RequestMetrics::with_config(config, &registry).unwrap();
        create_api_router(request_metrics, registry, "/metrics")
    }

    #[tokio::test]
    async fn scrape_shows_recorded_routes() {
        let app = app_with(MetricsConfig::default());

        assert_eq!(send(&app, "/users/1").await.status(), StatusCode::OK);
        assert_eq!(send(&app, "/users/404").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send(&app, "/random/path").await.status(), StatusCode::NOT_FOUND);

        let text = body_text(send(&app, "/metrics").await).await;
        assert!(text.contains("echo_http_requests_total"));
        assert!(text.contains("handler=\"/users/{id}\""));
        assert!(text.contains("status=\"2xx\""));
        assert!(text.contains("status=\"4xx\""));
        assert!(text.contains("handler=\"/not-found\""));
        assert!(!text.contains("/random/path"));
    }

    #[tokio::test]
    async fn skipped_endpoints_stay_out_of_scrape() {
        let app = app_with(MetricsConfig::default().with_skipper(|info, _| {
            matches!(info.route(), "/healthz" | "/metrics")
        }));

        for _ in 0..5 {
            assert_eq!(send(&app, "/healthz").await.status(), StatusCode::OK);
        }
        send(&app, "/metrics").await;

        let text = body_text(send(&app, "/metrics").await).await;
        assert!(!text.contains("handler=\"/healthz\""));
        assert!(!text.contains("handler=\"/metrics\""));
    }

    #[tokio::test]
    async fn fallback_returns_json_error() {
        let app = app_with(MetricsConfig::default());
        let resp = send(&app, "/nope").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Route not found");
    }
}
