//! Simulated order endpoint.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::OrderResponse;
use crate::repositories::StockDecrement;
use crate::routes::AppState;

/// The product every demo order is placed against.
pub const DEMO_ORDER_PRODUCT_ID: u64 = 101;

/// Handler for POST /orders.
///
/// Always succeeds with 201: the order itself is simulated, so placing it
/// is the business fact and is recorded first. Afterwards the demo
/// product's stock is decremented best-effort; only an actual decrement
/// updates the inventory gauge. A depleted product logs a warning and
/// leaves both stock and gauge untouched.
pub async fn place_order(State(state): State<Arc<AppState>>) -> (StatusCode, Json<OrderResponse>) {
    tracing::info!(target: "store.orders", "simulating order placement");
    state.metrics.record_order_placed();

    match state.store.decrement_stock(DEMO_ORDER_PRODUCT_ID).await {
        StockDecrement::Updated(product) => {
            state.metrics.record_inventory_level(
                product.id,
                &product.category,
                &product.brand,
                product.stock,
            );
            tracing::info!(
                target: "store.orders",
                product_id = product.id,
                stock = product.stock,
                "inventory updated after order"
            );
        }
        StockDecrement::Depleted(product) => {
            tracing::warn!(
                target: "store.orders",
                product_id = product.id,
                "ordered product is out of stock"
            );
        }
        StockDecrement::NotFound => {
            tracing::warn!(
                target: "store.orders",
                product_id = DEMO_ORDER_PRODUCT_ID,
                "ordered product does not exist"
            );
        }
    }

    (
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order placed successfully!".to_string(),
            order_id: format!("ORD-{}", Uuid::new_v4()),
        }),
    )
}
