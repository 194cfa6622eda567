//! Storefront models.
//!
//! Contains the catalog data types and the request/response bodies of the
//! HTTP API. Wire field names are camelCase (`productId`, `orderId`) to
//! match the storefront's published API.

use serde::{Deserialize, Serialize};

/// A storefront customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: u64,

    /// Customer display name.
    pub name: String,

    /// Customer email address.
    pub email: String,
}

/// A product in the electronics catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: u64,

    /// Product display name.
    pub name: String,

    /// Product category (e.g., "Laptops").
    pub category: String,

    /// Manufacturer brand.
    pub brand: String,

    /// Unit price.
    pub price: f64,

    /// Units currently in stock.
    pub stock: u32,
}

/// Default category/brand applied when a created product omits them.
pub const UNKNOWN_ATTRIBUTE: &str = "Unknown";

/// Request to create a customer.
///
/// Fields are optional so presence checks can answer with 400 rather than
/// a body-deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CreateCustomerRequest {
    /// Validate presence of both fields.
    ///
    /// # Errors
    ///
    /// Returns an error message if name or email is missing or empty.
    pub fn validate(self) -> Result<(String, String), &'static str> {
        match (self.name, self.email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Ok((name, email))
            }
            _ => Err("Name and email are required"),
        }
    }
}

/// Validated fields for a new catalog product, defaults applied.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub stock: u32,
}

/// Request to create a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: Option<u32>,
}

impl CreateProductRequest {
    /// Validate presence of name and price; apply defaults for the rest.
    ///
    /// # Errors
    ///
    /// Returns an error message if name or price is missing.
    pub fn validate(self) -> Result<NewProduct, &'static str> {
        let (Some(name), Some(price)) = (self.name, self.price) else {
            return Err("Name and price are required");
        };
        if name.is_empty() {
            return Err("Name and price are required");
        }
        Ok(NewProduct {
            name,
            price,
            category: self.category.unwrap_or_else(|| UNKNOWN_ATTRIBUTE.to_string()),
            brand: self.brand.unwrap_or_else(|| UNKNOWN_ATTRIBUTE.to_string()),
            stock: self.stock.unwrap_or(0),
        })
    }
}

/// Request to add a product to the cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Option<u64>,

    /// Defaults to 1 when omitted.
    pub quantity: Option<u32>,
}

impl AddToCartRequest {
    /// Validate presence of the product id; default quantity to 1.
    ///
    /// # Errors
    ///
    /// Returns an error message if the product id is missing.
    pub fn validate(self) -> Result<(u64, u32), &'static str> {
        let Some(product_id) = self.product_id else {
            return Err("productId is required");
        };
        Ok((product_id, self.quantity.unwrap_or(1)))
    }
}

/// Response after adding items to the cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub message: String,
}

/// Response after placing an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub message: String,

    /// Demo order confirmation id.
    pub order_id: String,
}
