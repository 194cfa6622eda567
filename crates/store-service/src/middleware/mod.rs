//! Middleware for the storefront service.

pub mod http_metrics;

pub use http_metrics::{http_metrics_middleware, RequestInstrumentation};
