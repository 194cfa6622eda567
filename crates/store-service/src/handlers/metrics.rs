//! Metrics exposition endpoint handler.
//!
//! Provides the `/metrics` endpoint for Prometheus scraping.
//!
//! # Security
//!
//! This endpoint is unauthenticated to allow the collector to scrape. No
//! PII or secrets are exposed, only operational counters and levels.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::observability::registry::{MetricRegistry, EXPOSITION_CONTENT_TYPE};

/// Handler for GET /metrics.
///
/// Returns the registry snapshot in the text exposition format:
/// ```text
/// # HELP http_requests_total Total number of HTTP requests
/// # TYPE http_requests_total counter
/// http_requests_total{method="GET",route="/products",code="200"} 42
/// ```
///
/// On a snapshot failure, returns 500 with the error text as the body - a
/// best-effort diagnostic for the scraper, not retried.
pub async fn metrics_handler(State(registry): State<Arc<MetricRegistry>>) -> Response {
    match registry.snapshot() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(target: "store.metrics", error = %e, "failed to build metrics snapshot");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
