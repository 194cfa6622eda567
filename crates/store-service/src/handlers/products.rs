//! Product catalog endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::models::{CreateProductRequest, Product};
use crate::routes::AppState;

/// Handler for GET /products.
pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.store.list_products().await)
}

/// Handler for GET /products/:id.
///
/// A successful lookup is a product-detail view, recorded after the
/// product is found; a 404 records nothing.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, StoreError> {
    let Some(product) = state.store.get_product(id).await else {
        return Err(StoreError::NotFound("Product not found".to_string()));
    };

    state
        .metrics
        .record_product_view(product.id, &product.category, &product.brand);
    tracing::debug!(target: "store.products", product_id = product.id, "product detail viewed");

    Ok(Json(product))
}

/// Handler for POST /products.
///
/// Presence check only: name and price must be supplied; category and
/// brand default to "Unknown", stock to 0. The inventory gauge is set for
/// the new product once it exists in the catalog.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), StoreError> {
    let new_product = request
        .validate()
        .map_err(|msg| StoreError::BadRequest(msg.to_string()))?;

    let product = state.store.create_product(new_product).await;
    state
        .metrics
        .record_inventory_level(product.id, &product.category, &product.brand, product.stock);
    tracing::info!(target: "store.products", product_id = product.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}
