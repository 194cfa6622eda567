//! Data access for the storefront service.

pub mod store;

pub use store::{StockDecrement, StoreRepository};
