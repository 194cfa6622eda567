//! Simulated cart endpoint.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::models::{AddToCartRequest, CartResponse};
use crate::routes::AppState;

/// Handler for POST /cart.
///
/// No cart is actually stored; the endpoint validates the product and
/// records the cart-add event with the requested quantity.
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>, StoreError> {
    let (product_id, quantity) = request
        .validate()
        .map_err(|msg| StoreError::BadRequest(msg.to_string()))?;

    let Some(product) = state.store.get_product(product_id).await else {
        return Err(StoreError::NotFound(
            "Product not found to add to cart".to_string(),
        ));
    };

    state
        .metrics
        .record_cart_add(product.id, &product.category, quantity);
    tracing::info!(
        target: "store.cart",
        product_id = product.id,
        quantity,
        "items added to cart"
    );

    Ok(Json(CartResponse {
        message: format!("{} x {} added to cart!", quantity, product.name),
    }))
}
