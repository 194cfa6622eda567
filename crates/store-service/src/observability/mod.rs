//! Observability module for the storefront service.
//!
//! Provides the metric instruments, the registry that serializes them for
//! scraping, and the service's metric catalog with its recorder call sites.

pub mod instrument;
pub mod metrics;
pub mod registry;
