//! Customer endpoints.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::models::{CreateCustomerRequest, Customer};
use crate::routes::AppState;

/// Handler for GET /customers.
pub async fn list_customers(State(state): State<Arc<AppState>>) -> Json<Vec<Customer>> {
    Json(state.store.list_customers().await)
}

/// Handler for POST /customers.
///
/// Presence check only: both name and email must be supplied and
/// non-empty. Returns 201 with the created customer.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), StoreError> {
    let (name, email) = request
        .validate()
        .map_err(|msg| StoreError::BadRequest(msg.to_string()))?;

    let customer = state.store.create_customer(name, email).await;
    tracing::info!(target: "store.customers", customer_id = customer.id, "customer created");

    Ok((StatusCode::CREATED, Json(customer)))
}
