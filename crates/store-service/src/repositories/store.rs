//! In-memory storefront state.
//!
//! Customers and products live in plain vectors behind a `tokio::sync::RwLock`;
//! lookups are linear scans. This is demo-grade storage: no persistence and
//! no cross-restart identity, matching the simulated store the service fronts.

use tokio::sync::RwLock;

use crate::models::{Customer, NewProduct, Product};

/// First auto-assigned customer id (two customers are seeded).
const FIRST_CUSTOMER_ID: u64 = 3;

/// First auto-assigned product id (three products are seeded).
const FIRST_PRODUCT_ID: u64 = 104;

/// Result of attempting to decrement a product's stock.
#[derive(Debug, Clone)]
pub enum StockDecrement {
    /// Stock was decremented; carries the updated product.
    Updated(Product),

    /// The product exists but has no units left.
    Depleted(Product),

    /// No product with the requested id.
    NotFound,
}

struct StoreInner {
    customers: Vec<Customer>,
    products: Vec<Product>,
    next_customer_id: u64,
    next_product_id: u64,
}

/// Shared in-memory store, seeded with the demo catalog.
pub struct StoreRepository {
    inner: RwLock<StoreInner>,
}

impl StoreRepository {
    /// Build the store with the demo customers and products.
    pub fn with_seed_data() -> Self {
        let customers = vec![
            Customer {
                id: 1,
                name: "Harsh".to_string(),
                email: "harsh@gmail.com".to_string(),
            },
            Customer {
                id: 2,
                name: "Vaibhav".to_string(),
                email: "vaibhav@gmail.com".to_string(),
            },
        ];
        let products = vec![
            Product {
                id: 101,
                name: "Gaming Laptop".to_string(),
                category: "Laptops".to_string(),
                brand: "MSI".to_string(),
                price: 70000.0,
                stock: 15,
            },
            Product {
                id: 102,
                name: "Wireless Mouse".to_string(),
                category: "Accessories".to_string(),
                brand: "HP".to_string(),
                price: 2500.0,
                stock: 120,
            },
            Product {
                id: 103,
                name: "4K Monitor".to_string(),
                category: "Monitors".to_string(),
                brand: "Lenovo".to_string(),
                price: 19000.0,
                stock: 30,
            },
        ];

        Self {
            inner: RwLock::new(StoreInner {
                customers,
                products,
                next_customer_id: FIRST_CUSTOMER_ID,
                next_product_id: FIRST_PRODUCT_ID,
            }),
        }
    }

    /// All customers, in insertion order.
    pub async fn list_customers(&self) -> Vec<Customer> {
        self.inner.read().await.customers.clone()
    }

    /// Create a customer with the next free id.
    pub async fn create_customer(&self, name: String, email: String) -> Customer {
        let mut inner = self.inner.write().await;
        let customer = Customer {
            id: inner.next_customer_id,
            name,
            email,
        };
        inner.next_customer_id += 1;
        inner.customers.push(customer.clone());
        customer
    }

    /// All products, in insertion order.
    pub async fn list_products(&self) -> Vec<Product> {
        self.inner.read().await.products.clone()
    }

    /// Look up a product by id.
    pub async fn get_product(&self, id: u64) -> Option<Product> {
        self.inner
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Add a product to the catalog with the next free id.
    pub async fn create_product(&self, new_product: NewProduct) -> Product {
        let mut inner = self.inner.write().await;
        let product = Product {
            id: inner.next_product_id,
            name: new_product.name,
            category: new_product.category,
            brand: new_product.brand,
            price: new_product.price,
            stock: new_product.stock,
        };
        inner.next_product_id += 1;
        inner.products.push(product.clone());
        product
    }

    /// Decrement a product's stock by one, if any remains.
    pub async fn decrement_stock(&self, id: u64) -> StockDecrement {
        let mut inner = self.inner.write().await;
        match inner.products.iter_mut().find(|p| p.id == id) {
            Some(product) if product.stock > 0 => {
                product.stock -= 1;
                StockDecrement::Updated(product.clone())
            }
            Some(product) => StockDecrement::Depleted(product.clone()),
            None => StockDecrement::NotFound,
        }
    }
}
