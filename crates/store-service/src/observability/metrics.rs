//! Metric catalog for the storefront service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `electronics_` prefix for storefront business metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! HTTP labels are bounded: `method` is bounded by the HTTP verbs the
//! router accepts, `route` is normalized to a fixed set of templates (see
//! [`normalize_route`]), `code` is bounded by emitted status codes. The
//! business metrics carry a `productId` label, so their cardinality grows
//! with the catalog; that is acceptable for this demo-sized store but is
//! the first thing to bound before pointing real traffic at it.
//!
//! # Failure policy
//!
//! Recorder methods never return errors. Instrumentation is best-effort:
//! an instrument-level failure is logged and swallowed so it cannot alter
//! the outcome of the business operation it is attached to.

use std::sync::Arc;
use std::time::Duration;

use crate::observability::instrument::{Counter, Gauge, Histogram, MetricError};
use crate::observability::registry::MetricRegistry;

/// Histogram buckets for HTTP request durations, in seconds.
pub const HTTP_DURATION_BUCKETS: [f64; 9] = [0.1, 0.3, 0.5, 0.7, 1.0, 3.0, 5.0, 7.0, 10.0];

/// Handles to every instrument the service records into.
///
/// Built once in `main` via [`StoreMetrics::register`] and threaded through
/// `AppState`; cloning shares the underlying instruments.
#[derive(Clone)]
pub struct StoreMetrics {
    http_requests_total: Arc<Counter>,
    http_request_duration_seconds: Arc<Histogram>,
    product_detail_views_total: Arc<Counter>,
    items_added_to_cart_total: Arc<Counter>,
    orders_placed_total: Arc<Counter>,
    inventory_level: Arc<Gauge>,
}

impl StoreMetrics {
    /// Construct every instrument and register it with `registry`.
    ///
    /// # Errors
    ///
    /// `DuplicateMetricName` if any name is already taken. Registration
    /// happens once at startup, so this is fatal: `main` propagates it.
    pub fn register(registry: &MetricRegistry) -> Result<Self, MetricError> {
        let http_requests_total = Arc::new(Counter::new(
            "http_requests_total",
            "Total number of HTTP requests",
            &["method", "route", "code"],
        ));
        registry.register(http_requests_total.clone())?;

        let http_request_duration_seconds = Arc::new(Histogram::new(
            "http_request_duration_seconds",
            "Duration of HTTP requests in seconds",
            &["method", "route", "code"],
            &HTTP_DURATION_BUCKETS,
        ));
        registry.register(http_request_duration_seconds.clone())?;

        let product_detail_views_total = Arc::new(Counter::new(
            "electronics_product_detail_views_total",
            "Total number of times product detail pages were viewed",
            &["productId", "category", "brand"],
        ));
        registry.register(product_detail_views_total.clone())?;

        let items_added_to_cart_total = Arc::new(Counter::new(
            "electronics_items_added_to_cart_total",
            "Total number of items added to shopping carts",
            &["productId", "category"],
        ));
        registry.register(items_added_to_cart_total.clone())?;

        let orders_placed_total = Arc::new(Counter::new(
            "electronics_orders_placed_total",
            "Total number of orders successfully placed",
            &[],
        ));
        registry.register(orders_placed_total.clone())?;

        let inventory_level = Arc::new(Gauge::new(
            "electronics_inventory_level",
            "Current inventory level for a product",
            &["productId", "category", "brand"],
        ));
        registry.register(inventory_level.clone())?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            product_detail_views_total,
            items_added_to_cart_total,
            orders_placed_total,
            inventory_level,
        })
    }

    /// Record HTTP request completion.
    ///
    /// Metric: `http_requests_total`, `http_request_duration_seconds`
    /// Labels: `method`, `route`, `code`
    ///
    /// The route label is normalized to a fixed template set before
    /// recording so path parameters cannot mint unbounded time series.
    pub fn record_http_request(
        &self,
        method: &str,
        path: &str,
        status_code: u16,
        duration: Duration,
    ) {
        let route = normalize_route(path);
        let code = status_code.to_string();
        let labels = [method, route, code.as_str()];

        log_if_rejected(
            self.http_request_duration_seconds
                .observe(&labels, duration.as_secs_f64()),
        );
        log_if_rejected(self.http_requests_total.increment(&labels));
    }

    /// Record a product detail page view.
    ///
    /// Metric: `electronics_product_detail_views_total`
    /// Labels: `productId`, `category`, `brand`
    pub fn record_product_view(&self, product_id: u64, category: &str, brand: &str) {
        let id = product_id.to_string();
        log_if_rejected(
            self.product_detail_views_total
                .increment(&[id.as_str(), category, brand]),
        );
    }

    /// Record items added to a shopping cart.
    ///
    /// Metric: `electronics_items_added_to_cart_total`
    /// Labels: `productId`, `category`
    pub fn record_cart_add(&self, product_id: u64, category: &str, quantity: u32) {
        let id = product_id.to_string();
        log_if_rejected(
            self.items_added_to_cart_total
                .increment_by(&[id.as_str(), category], f64::from(quantity)),
        );
    }

    /// Record a successfully placed order.
    ///
    /// Metric: `electronics_orders_placed_total` (no labels)
    pub fn record_order_placed(&self) {
        log_if_rejected(self.orders_placed_total.increment(&[]));
    }

    /// Record the current inventory level of a product.
    ///
    /// Metric: `electronics_inventory_level`
    /// Labels: `productId`, `category`, `brand`
    ///
    /// Called after the stock level actually changed (and once per product
    /// at startup), never speculatively.
    pub fn record_inventory_level(&self, product_id: u64, category: &str, brand: &str, stock: u32) {
        let id = product_id.to_string();
        log_if_rejected(
            self.inventory_level
                .set(&[id.as_str(), category, brand], f64::from(stock)),
        );
    }
}

/// Downgrade an instrument error to a log entry.
///
/// Arity mismatches and negative increments are programming errors, but a
/// broken metric must never take a request down with it.
fn log_if_rejected(result: Result<(), MetricError>) {
    if let Err(e) = result {
        tracing::error!(target: "store.metrics", error = %e, "metric update rejected");
    }
}

/// Normalize a request path to a bounded route label.
///
/// Replaces the product id segment with a placeholder and collapses
/// unknown paths to `/other` so label cardinality stays fixed no matter
/// what clients request.
pub fn normalize_route(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/health" => "/health",
        "/customers" => "/customers",
        "/products" => "/products",
        "/cart" => "/cart",
        "/orders" => "/orders",
        "/intentional-error" => "/intentional-error",
        _ => normalize_dynamic_route(path),
    }
}

/// Product detail pages: `/products/{id}`.
fn normalize_dynamic_route(path: &str) -> &'static str {
    if let Some(rest) = path.strip_prefix("/products/") {
        if !rest.is_empty() && !rest.contains('/') {
            return "/products/{id}";
        }
    }
    "/other"
}
