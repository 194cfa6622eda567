//! HTTP routes for the storefront service.
//!
//! Defines the Axum router and application state.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::errors::StoreError;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, RequestInstrumentation};
use crate::observability::metrics::StoreMetrics;
use crate::observability::registry::MetricRegistry;
use crate::repositories::StoreRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// In-memory storefront data.
    pub store: Arc<StoreRepository>,

    /// Metric handles for domain-event recording.
    pub metrics: StoreMetrics,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - greeting, `/health` - liveness probe
/// - `/customers`, `/products`, `/products/:id`, `/cart`, `/orders` -
///   storefront endpoints
/// - `/intentional-error` - deliberate 500 for alert testing
/// - `/metrics` - exposition endpoint with its own state
/// - TraceLayer for request logging
/// - 30 second request timeout
/// - HTTP metrics middleware (outermost)
pub fn build_routes(
    state: Arc<AppState>,
    registry: Arc<MetricRegistry>,
    metrics_exempt_paths: &[String],
) -> Router {
    let instrumentation = RequestInstrumentation::new(state.metrics.clone(), metrics_exempt_paths);

    let api_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/products/:id", get(handlers::get_product))
        .route("/cart", post(handlers::add_to_cart))
        .route("/orders", post(handlers::place_order))
        .route("/intentional-error", get(handlers::intentional_error))
        .with_state(state);

    // Exposition route with its own state so scraping only needs the
    // registry, not the whole application.
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(registry);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    api_routes
        .merge(metrics_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn_with_state(
            instrumentation,
            http_metrics_middleware,
        ))
}

/// Fallback for unknown paths; recorded by the metrics middleware as a
/// 404 on the `/other` route.
async fn not_found() -> StoreError {
    StoreError::NotFound("Sorry, can't find that endpoint!".to_string())
}
