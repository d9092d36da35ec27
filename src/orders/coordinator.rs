//! Cache-aside coordination between the record store and the cache
//!
//! The coordinator is the only component that talks to both stores. It owns
//! no data of its own: every call resolves against the record store (the
//! source of truth) and uses the cache purely as an optimization.
//!
//! # Read path
//!
//! `get_by_id` looks up `order_<id>` in the cache. A live, decodable entry is
//! returned as-is without revalidation. Anything else (absent, expired,
//! undecodable, cache unreachable) falls through to the record store, and a
//! found record is written back with the configured TTL. Misses in the record
//! store are not cached.
//!
//! # Write path
//!
//! `create` only touches the record store: the cache is populated lazily on
//! the first read. `delete` removes the durable record first and invalidates
//! the cache key second, so a returned `delete` means the record is gone even
//! if invalidation failed.
//!
//! # Staleness
//!
//! There is no per-key locking. A `get_by_id` that fetched a record just before
//! a concurrent `delete` committed can still write it back to the cache, and
//! a failed invalidation leaves the old entry behind. In both cases the entry
//! disappears when its TTL runs out: the cache can lag a delete by at most
//! [`DEFAULT_CACHE_TTL`] (or the configured TTL), never indefinitely.

use crate::core::codec::{self, cache_key};
use crate::core::error::{CacheError, OrdersError, OrdersResult};
use crate::core::order::{NewOrder, Order};
use crate::core::service::{CacheStore, OrderStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How long a cached order may be served without consulting the store
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Outcome of a cache lookup, with every failure already classified
enum CacheLookup {
    Hit(Order),
    Miss,
    Corrupt,
    Unavailable,
}

/// Cache-aside coordinator over an [`OrderStore`] and a [`CacheStore`]
///
/// Cheap to clone; clones share the underlying stores and counters.
#[derive(Clone)]
pub struct CacheAsideCoordinator {
    store: Arc<dyn OrderStore>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
    stats: Arc<CacheStats>,
}

impl CacheAsideCoordinator {
    /// Create a coordinator with the default 5 minute TTL
    pub fn new(store: Arc<dyn OrderStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            cache,
            ttl: DEFAULT_CACHE_TTL,
            stats: Arc::new(CacheStats::default()),
        }
    }

    /// Override the cache TTL (the staleness bound)
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Persist a new order.
    ///
    /// The cache is not written: entries only appear on the first read.
    pub async fn create(&self, order: NewOrder) -> OrdersResult<Order> {
        let created = self.store.create(order).await?;
        info!(order_id = %created.id, "Order created successfully");
        Ok(created)
    }

    /// Fetch one order, serving from the cache when possible
    pub async fn get_by_id(&self, id: &Uuid) -> OrdersResult<Order> {
        let key = cache_key(id);

        let lookup = self.lookup(&key).await;
        if let CacheLookup::Hit(order) = lookup {
            info!(order_id = %id, "Order retrieved from cache");
            return Ok(order);
        }

        let Some(order) = self.store.get_by_id(id).await? else {
            if let CacheLookup::Corrupt = lookup {
                self.evict(&key).await;
            }
            warn!(order_id = %id, "Order not found");
            return Err(OrdersError::NotFound { id: *id });
        };

        self.populate(&key, &order).await;
        info!(order_id = %id, "Order retrieved from store and cached");
        Ok(order)
    }

    /// List every order, most recent first. Never uses the cache.
    pub async fn get_all(&self) -> OrdersResult<Vec<Order>> {
        let orders = self.store.get_all().await?;
        info!(count = orders.len(), "Retrieved orders from store");
        Ok(orders)
    }

    /// Delete an order, then invalidate its cache entry
    pub async fn delete(&self, id: &Uuid) -> OrdersResult<()> {
        if !self.store.delete_by_id(id).await? {
            warn!(order_id = %id, "Order not found for deletion");
            return Err(OrdersError::NotFound { id: *id });
        }

        // The durable delete has committed; from here on the call succeeds
        let key = cache_key(id);
        if let Err(e) = self.cache.delete(&key).await {
            self.stats.cache_errors.fetch_add(1, Ordering::Relaxed);
            warn!(
                order_id = %id,
                error = %e,
                ttl_secs = self.ttl.as_secs(),
                "Cache invalidation failed; stale entry expires with its TTL"
            );
        }

        info!(order_id = %id, "Order deleted successfully");
        Ok(())
    }

    async fn lookup(&self, key: &str) -> CacheLookup {
        match self.read_cached(key).await {
            Ok(Some(order)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Hit(order)
            }
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache miss");
                CacheLookup::Miss
            }
            Err(CacheError::Codec(e)) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                warn!(key, error = %e, "Discarding undecodable cache entry");
                CacheLookup::Corrupt
            }
            Err(e) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                self.stats.cache_errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, error = %e, "Cache read failed, falling back to store");
                CacheLookup::Unavailable
            }
        }
    }

    async fn read_cached(&self, key: &str) -> Result<Option<Order>, CacheError> {
        let Some(bytes) = self.cache.get(key).await? else {
            return Ok(None);
        };
        Ok(Some(codec::decode(&bytes)?))
    }

    async fn populate(&self, key: &str, order: &Order) {
        let result = match codec::encode(order) {
            Ok(bytes) => self.cache.set_with_ttl(key, bytes, self.ttl).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            self.stats.cache_errors.fetch_add(1, Ordering::Relaxed);
            warn!(key, error = %e, "Failed to populate cache");
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            self.stats.cache_errors.fetch_add(1, Ordering::Relaxed);
            warn!(key, error = %e, "Failed to evict undecodable cache entry");
        }
    }
}

/// Lock-free cache counters
#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    decode_failures: AtomicU64,
    cache_errors: AtomicU64,
}

impl CacheStats {
    fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the coordinator's cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    /// Reads served from the cache
    pub hits: u64,
    /// Reads that fell through to the store (includes corrupt and unavailable)
    pub misses: u64,
    /// Entries that could not be decoded
    pub decode_failures: u64,
    /// Swallowed cache failures (read, populate, invalidate)
    pub cache_errors: u64,
}

impl CacheStatsSnapshot {
    /// Fraction of reads served from the cache, 0.0 when nothing was read
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
