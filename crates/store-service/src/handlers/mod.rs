//! HTTP request handlers for the storefront service.

pub mod cart;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

pub use cart::add_to_cart;
pub use customers::{create_customer, list_customers};
pub use health::{health_check, intentional_error, root};
pub use metrics::metrics_handler;
pub use orders::place_order;
pub use products::{create_product, get_product, list_products};
