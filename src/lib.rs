//! # orders-cache
//!
//! An order records service that keeps a fast TTL cache consistent with an
//! authoritative record store, using the cache-aside pattern.
//!
//! ## Features
//!
//! - **Cache-aside reads**: `get_by_id` serves from the cache, falls back to
//!   the store on a miss and repopulates the entry with a TTL
//! - **Lazy population**: creating an order never writes the cache; entries
//!   appear on the first read
//! - **Write-invalidate**: deletes commit to the store first, then drop the
//!   cache key
//! - **Bounded staleness**: with no locking between concurrent operations, a
//!   stale entry can outlive a delete by at most the cache TTL
//! - **Cache failures are never fatal**: an unreachable cache or an
//!   undecodable entry degrades to a miss; only store failures reach callers
//! - **Pluggable backends**: in-memory stores, PostgreSQL (`postgres`
//!   feature) and Redis (`redis` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orders::prelude::*;
//!
//! let coordinator = CacheAsideCoordinator::new(
//!     Arc::new(InMemoryOrderStore::new()),
//!     Arc::new(InMemoryCacheStore::new()),
//! );
//!
//! let order = coordinator
//!     .create(NewOrder::new("Ada Lovelace", "Analytical Engine", Amount::from_cents(12_50)))
//!     .await?;
//!
//! // First read goes to the store and caches `order_<id>` for 5 minutes
//! let fetched = coordinator.get_by_id(&order.id).await?;
//!
//! coordinator.delete(&order.id).await?;
//! ```

pub mod config;
pub mod core;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        codec::{CACHE_KEY_PREFIX, cache_key},
        error::{
            CacheError, CodecError, ConfigError, OrdersError, OrdersResult, PersistenceError,
            RequestError, ValidationError,
        },
        order::{Amount, CreateOrderRequest, NewOrder, Order},
        service::{CacheStore, OrderStore},
        validation::ValidatedJson,
    };

    // === Coordinator & Handlers ===
    pub use crate::orders::{
        AppState, CacheAsideCoordinator, CacheStatsSnapshot, DEFAULT_CACHE_TTL,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryCacheStore, InMemoryOrderStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderStore;
    #[cfg(feature = "redis")]
    pub use crate::storage::RedisCacheStore;

    // === Config ===
    pub use crate::config::{AppConfig, CacheBackend, StorageBackend};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
