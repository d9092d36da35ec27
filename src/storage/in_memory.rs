//! In-memory record store and cache for testing and development

use crate::core::error::{CacheError, PersistenceError};
use crate::core::order::{Amount, NewOrder, Order, TEXT_MAX_CHARS};
use crate::core::service::{CacheStore, OrderStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

const STORE_BACKEND: &str = "memory";
const CACHE_BACKEND: &str = "memory-cache";

/// In-memory order store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same map. Applies the same amount and length constraints
/// as the PostgreSQL schema.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn check_constraints(order: &NewOrder) -> Result<(), PersistenceError> {
        if order.amount < Amount::MIN {
            return Err(PersistenceError::ConstraintViolation {
                constraint: "ck_order_amount_min_value".to_string(),
                message: format!("amount {} is below {}", order.amount, Amount::MIN),
            });
        }
        if order.amount > Amount::MAX {
            return Err(PersistenceError::ConstraintViolation {
                constraint: "ck_order_amount_max_value".to_string(),
                message: format!("amount {} is above {}", order.amount, Amount::MAX),
            });
        }
        for (column, value) in [
            ("customer_name", &order.customer_name),
            ("product", &order.product),
        ] {
            if value.is_empty() || value.chars().count() > TEXT_MAX_CHARS {
                return Err(PersistenceError::ConstraintViolation {
                    constraint: column.to_string(),
                    message: format!("{} must hold 1 to {} characters", column, TEXT_MAX_CHARS),
                });
            }
        }
        Ok(())
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, PersistenceError> {
        Self::check_constraints(&order)?;

        let mut orders = self
            .orders
            .write()
            .map_err(|e| PersistenceError::query(STORE_BACKEND, format!("Failed to acquire write lock: {}", e)))?;

        // v4 collisions are not a practical concern, but ids must never repeat
        let mut id = Uuid::new_v4();
        while orders.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let created = order.into_order(id, Utc::now());
        orders.insert(id, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Order>, PersistenceError> {
        let orders = self
            .orders
            .read()
            .map_err(|e| PersistenceError::query(STORE_BACKEND, format!("Failed to acquire read lock: {}", e)))?;

        Ok(orders.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Order>, PersistenceError> {
        let orders = self
            .orders
            .read()
            .map_err(|e| PersistenceError::query(STORE_BACKEND, format!("Failed to acquire read lock: {}", e)))?;

        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(all)
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool, PersistenceError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| PersistenceError::query(STORE_BACKEND, format!("Failed to acquire write lock: {}", e)))?;

        Ok(orders.remove(id).is_some())
    }
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory TTL cache
///
/// Expiry is measured on the tokio clock, so tests can pause and advance
/// time. Expired entries read as absent; they are pruned when read and
/// swept on every write.
#[derive(Clone)]
pub struct InMemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCacheStore {
    /// Create a new, empty cache
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether a live entry exists under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.ttl_remaining(key).is_some()
    }

    /// Time left before the entry under `key` expires
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at - now)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|entries| entries.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        {
            let entries = self
                .entries
                .read()
                .map_err(|e| CacheError::unavailable(CACHE_BACKEND, e))?;

            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: prune unless a fresh value was written in the meantime
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::unavailable(CACHE_BACKEND, e))?;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::unavailable(CACHE_BACKEND, e))?;

        let now = Instant::now();
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::unavailable(CACHE_BACKEND, e))?;

        entries.remove(key);

        Ok(())
    }
}
