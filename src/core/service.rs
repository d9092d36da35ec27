//! Store traits consumed by the cache-aside coordinator

use crate::core::error::{CacheError, PersistenceError};
use crate::core::order::{NewOrder, Order};
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// Durable, authoritative storage for orders
///
/// Implementations assign `id` and `created_at` on create and give
/// linearizable single-key reads and writes once a call has returned.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order, assigning its id and creation time
    async fn create(&self, order: NewOrder) -> Result<Order, PersistenceError>;

    /// Get an order by ID; absence is not an error
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Order>, PersistenceError>;

    /// List all orders, most recently created first
    async fn get_all(&self) -> Result<Vec<Order>, PersistenceError>;

    /// Delete an order, returning whether one existed
    async fn delete_by_id(&self, id: &Uuid) -> Result<bool, PersistenceError>;
}

/// Key-value cache with per-key expiry
///
/// Values are opaque bytes. Every operation is best-effort: a transport or
/// availability failure comes back as [`CacheError::Unavailable`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the live value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration)
    -> Result<(), CacheError>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
