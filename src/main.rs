//! `orders-api`: the orders HTTP service
//!
//! Usage: `orders-api [config.yaml]` (or set `ORDERS_CONFIG`). Without a file
//! the defaults apply: in-memory store and cache on 127.0.0.1:3000.

use anyhow::{Context, Result};
use orders::config::{AppConfig, CacheBackend, CacheConfig, StorageBackend, StorageConfig};
use orders::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ORDERS_CONFIG").ok());
    let config = AppConfig::load(path.as_deref()).context("Failed to load configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        storage = ?config.storage.backend,
        cache = ?config.cache.backend,
        ttl_secs = config.cache.ttl_secs,
        "Starting orders-api"
    );

    let store = order_store(&config.storage).await?;
    let cache = cache_store(&config.cache).await?;

    let result = ServerBuilder::new()
        .with_shared_order_store(store)
        .with_shared_cache_store(cache)
        .with_cache_ttl(config.cache_ttl())
        .serve(&config.server.bind)
        .await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application terminated unexpectedly");
    }
    result
}

async fn order_store(config: &StorageConfig) -> Result<Arc<dyn OrderStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryOrderStore::new())),
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("storage.database_url is required for postgres")?;
            let store = PostgresOrderStore::connect(url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("storage backend 'postgres' requires the `postgres` feature")
        }
    }
}

async fn cache_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(InMemoryCacheStore::new())),
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            let url = config
                .url
                .as_deref()
                .context("cache.url is required for redis")?;
            let cache = RedisCacheStore::connect(url).await?;
            Ok(Arc::new(cache))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => anyhow::bail!("cache backend 'redis' requires the `redis` feature"),
    }
}
