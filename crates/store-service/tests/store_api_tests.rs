//! Integration tests for the storefront endpoints, driven through the
//! real router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use store_service::observability::metrics::StoreMetrics;
use store_service::observability::registry::MetricRegistry;
use store_service::repositories::StoreRepository;
use store_service::routes::{build_routes, AppState};

async fn test_app() -> Router {
    let registry = Arc::new(MetricRegistry::new());
    let metrics = StoreMetrics::register(&registry).expect("registration should succeed");
    let store = Arc::new(StoreRepository::with_seed_data());
    let state = Arc::new(AppState { store, metrics });
    let exempt = vec!["/metrics".to_string(), "/favicon.ico".to_string()];
    build_routes(state, registry, &exempt)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builder should succeed");
    send_json(app, request).await
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builder should succeed");
    send_json(app, request).await
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    (status, json)
}

#[tokio::test]
async fn test_root_greeting() {
    let app = test_app().await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Electronics Store API Server is running!");
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_list_customers() {
    let app = test_app().await;

    let (status, body) = get(&app, "/customers").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["name"], "Harsh");
    assert_eq!(body[1]["email"], "vaibhav@gmail.com");
}

#[tokio::test]
async fn test_create_customer() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/customers",
        r#"{"name":"Asha","email":"asha@example.com"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Asha");

    let (_, customers) = get(&app, "/customers").await;
    assert_eq!(customers.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_create_customer_missing_email() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/customers", r#"{"name":"Asha"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Name and email are required");
}

#[tokio::test]
async fn test_list_products() {
    let app = test_app().await;

    let (status, body) = get(&app, "/products").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body.as_array().map(Vec::len), Some(3));
    assert_eq!(body[0]["id"], 101);
    assert_eq!(body[0]["brand"], "MSI");
}

#[tokio::test]
async fn test_get_product_detail() {
    let app = test_app().await;

    let (status, body) = get(&app, "/products/102").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Wireless Mouse");
    assert_eq!(body["stock"], 120);
}

#[tokio::test]
async fn test_get_product_not_found() {
    let app = test_app().await;

    let (status, body) = get(&app, "/products/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Product not found");
}

#[tokio::test]
async fn test_create_product_with_defaults() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/products", r#"{"name":"Webcam","price":3000}"#).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 104);
    assert_eq!(body["category"], "Unknown");
    assert_eq!(body["brand"], "Unknown");
    assert_eq!(body["stock"], 0);
}

#[tokio::test]
async fn test_create_product_missing_price() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/products", r#"{"name":"Webcam"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Name and price are required");
}

#[tokio::test]
async fn test_add_to_cart() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/cart", r#"{"productId":103,"quantity":2}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "2 x 4K Monitor added to cart!");
}

#[tokio::test]
async fn test_add_to_cart_unknown_product() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/cart", r#"{"productId":999}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Product not found to add to cart");
}

#[tokio::test]
async fn test_place_order_decrements_demo_stock() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/orders", "{}").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order placed successfully!");
    assert!(body["orderId"]
        .as_str()
        .map(|id| id.starts_with("ORD-"))
        .unwrap_or(false));

    let (_, product) = get(&app, "/products/101").await;
    assert_eq!(product["stock"], 14);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_json_404() {
    let app = test_app().await;

    let (status, body) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
