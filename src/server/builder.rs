//! ServerBuilder for fluent API to build HTTP servers

use super::router::{build_order_routes, health_routes};
use crate::core::service::{CacheStore, OrderStore};
use crate::orders::coordinator::{CacheAsideCoordinator, DEFAULT_CACHE_TTL};
use crate::orders::handlers::AppState;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the orders HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_order_store(InMemoryOrderStore::new())
///     .with_cache_store(InMemoryCacheStore::new())
///     .with_cache_ttl(Duration::from_secs(60))
///     .build()?;
/// ```
pub struct ServerBuilder {
    order_store: Option<Arc<dyn OrderStore>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            order_store: None,
            cache_store: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            custom_routes: Vec::new(),
        }
    }

    /// Set the record store (required)
    pub fn with_order_store(self, store: impl OrderStore + 'static) -> Self {
        self.with_shared_order_store(Arc::new(store))
    }

    /// Set an already shared record store (required)
    pub fn with_shared_order_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.order_store = Some(store);
        self
    }

    /// Set the cache store (required)
    pub fn with_cache_store(self, cache: impl CacheStore + 'static) -> Self {
        self.with_shared_cache_store(Arc::new(cache))
    }

    /// Set an already shared cache store (required)
    pub fn with_shared_cache_store(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(cache);
        self
    }

    /// Set the cache TTL (defaults to 5 minutes)
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the cache-aside coordinator from the configured stores
    pub fn build_coordinator(&self) -> Result<CacheAsideCoordinator> {
        let store = self
            .order_store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OrderStore is required. Call .with_order_store()"))?;
        let cache = self
            .cache_store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("CacheStore is required. Call .with_cache_store()"))?;

        Ok(CacheAsideCoordinator::new(store, cache).with_ttl(self.cache_ttl))
    }

    /// Build the final REST router
    ///
    /// This generates:
    /// - Health routes
    /// - Order routes
    /// - Custom routes
    ///
    /// wrapped in request tracing and a permissive CORS policy.
    pub fn build(mut self) -> Result<Router> {
        let coordinator = self.build_coordinator()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);

        let mut app = health_routes().merge(build_order_routes(AppState::new(coordinator)));
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
