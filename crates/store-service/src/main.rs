//! Storefront Service
//!
//! Entry point for the electronics storefront demo API. Serves the
//! storefront endpoints and exposes Prometheus metrics at `/metrics`.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use store_service::config::Config;
use store_service::observability::metrics::StoreMetrics;
use store_service::observability::registry::MetricRegistry;
use store_service::repositories::StoreRepository;
use store_service::routes::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "store_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Storefront Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address(),
        exempt_paths = ?config.metrics_exempt_paths,
        "Configuration loaded successfully"
    );

    // Build the metric registry. Registration runs once, before serving,
    // so a duplicate metric name is a startup failure.
    let registry = Arc::new(MetricRegistry::new());
    let metrics = StoreMetrics::register(&registry).map_err(|e| {
        error!("Failed to register metrics: {}", e);
        e
    })?;

    // Seed the in-memory store and publish initial inventory levels so
    // the gauge is scrapeable before any traffic arrives.
    let store = Arc::new(StoreRepository::with_seed_data());
    for product in store.list_products().await {
        metrics.record_inventory_level(product.id, &product.category, &product.brand, product.stock);
    }
    info!("Initial inventory levels set");

    // Create application state
    let state = Arc::new(AppState {
        store,
        metrics,
    });

    // Build application routes
    let app = routes::build_routes(state, registry, &config.metrics_exempt_paths);

    // Parse bind address
    let addr: SocketAddr = config.bind_address().parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Storefront Service listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Storefront Service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
