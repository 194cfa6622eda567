//! HTTP metrics middleware for capturing request/response metrics.
//!
//! Applied as the outermost layer so it captures ALL responses, including
//! framework-level errors that occur before handlers run (400 JSON parse
//! failures, 404, 405). Requests to the exposition route and other exempt
//! paths bypass instrumentation entirely so scrapes cannot skew the very
//! metrics they collect.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics::StoreMetrics;

/// State for the HTTP metrics middleware: the metric handles plus the
/// paths that must not be instrumented.
#[derive(Clone)]
pub struct RequestInstrumentation {
    metrics: StoreMetrics,
    exempt_paths: Arc<[String]>,
}

impl RequestInstrumentation {
    pub fn new(metrics: StoreMetrics, exempt_paths: &[String]) -> Self {
        Self {
            metrics,
            exempt_paths: exempt_paths.to_vec().into(),
        }
    }

    fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.iter().any(|exempt| exempt == path)
    }
}

/// Middleware that records request count and duration for all responses.
///
/// The timer starts before the inner service runs and the record step runs
/// after its response future resolves, so the pair fires exactly once per
/// request on every exit path (handler errors are already mapped to
/// responses by the time they pass back through here).
pub async fn http_metrics_middleware(
    State(instrumentation): State<RequestInstrumentation>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if instrumentation.is_exempt(&path) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status_code = response.status().as_u16();
    instrumentation
        .metrics
        .record_http_request(&method, &path, status_code, duration);

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::observability::registry::MetricRegistry;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn handler_200() -> &'static str {
        "OK"
    }

    async fn handler_500() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "Error")
    }

    fn test_app() -> (Arc<MetricRegistry>, Router) {
        let registry = Arc::new(MetricRegistry::new());
        let metrics = StoreMetrics::register(&registry).expect("registration should succeed");
        let instrumentation =
            RequestInstrumentation::new(metrics, &["/metrics".to_string(), "/favicon.ico".to_string()]);

        let app = Router::new()
            .route("/products", get(handler_200))
            .route("/error", get(handler_500))
            .route("/metrics", get(handler_200))
            .layer(middleware::from_fn_with_state(
                instrumentation,
                http_metrics_middleware,
            ));
        (registry, app)
    }

    async fn send(app: Router, uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request builder should succeed");
        let response = app.oneshot(request).await.expect("request should succeed");
        response.status()
    }

    #[tokio::test]
    async fn test_middleware_records_success() {
        let (registry, app) = test_app();

        let status = send(app, "/products").await;
        assert_eq!(status, StatusCode::OK);

        let snapshot = registry.snapshot().unwrap();
        assert!(snapshot
            .contains("http_requests_total{method=\"GET\",route=\"/products\",code=\"200\"} 1"));
        assert!(snapshot.contains(
            "http_request_duration_seconds_count{method=\"GET\",route=\"/products\",code=\"200\"} 1"
        ));
    }

    #[tokio::test]
    async fn test_middleware_records_error_status() {
        let (registry, app) = test_app();

        let status = send(app, "/error").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let snapshot = registry.snapshot().unwrap();
        // /error is not a known route template, so it lands in /other.
        assert!(snapshot
            .contains("http_requests_total{method=\"GET\",route=\"/other\",code=\"500\"} 1"));
    }

    #[tokio::test]
    async fn test_middleware_records_not_found() {
        let (registry, app) = test_app();

        let status = send(app, "/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let snapshot = registry.snapshot().unwrap();
        assert!(snapshot
            .contains("http_requests_total{method=\"GET\",route=\"/other\",code=\"404\"} 1"));
    }

    #[tokio::test]
    async fn test_exposition_route_is_exempt() {
        let (registry, app) = test_app();

        let status = send(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);

        let snapshot = registry.snapshot().unwrap();
        // Header lines exist, but no series was recorded at all.
        assert!(snapshot.contains("# TYPE http_requests_total counter"));
        assert!(!snapshot.contains("http_requests_total{"));
    }

    #[tokio::test]
    async fn test_favicon_is_exempt() {
        let (registry, app) = test_app();

        // No /favicon.ico route exists; the 404 must still go unrecorded.
        let status = send(app, "/favicon.ico").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let snapshot = registry.snapshot().unwrap();
        assert!(!snapshot.contains("http_requests_total{"));
    }
}
