//! Root, liveness, and diagnostics handlers.

use crate::errors::StoreError;

/// Root endpoint greeting.
///
/// Confirms the API server is up without touching any state.
pub async fn root() -> &'static str {
    "Electronics Store API Server is running!"
}

/// Liveness probe handler.
///
/// Returns a simple "OK" response to indicate the process is running.
/// Does NOT check any dependencies - the store is in-process, so there is
/// nothing external to probe.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Deliberate failure endpoint for exercising 500-alerting.
///
/// Always returns 500. Useful for verifying that error-rate alerts wired
/// to `http_requests_total{code="500"}` actually fire.
pub async fn intentional_error() -> StoreError {
    tracing::error!(target: "store.diagnostics", "Intentional 500 error triggered");
    StoreError::Internal
}
