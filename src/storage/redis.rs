//! Redis cache store.
//!
//! Gated behind the `redis` feature flag. Uses a `ConnectionManager`, which
//! multiplexes one connection across tasks and reconnects on its own; any
//! command failure is reported as [`CacheError::Unavailable`].

use crate::core::error::CacheError;
use crate::core::service::CacheStore;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

const BACKEND: &str = "Redis";

/// Cache store backed by Redis string values with `PX` expiry
#[derive(Clone)]
pub struct RedisCacheStore {
    conn: ConnectionManager,
}

impl RedisCacheStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect to `url` (e.g. `redis://127.0.0.1:6379/0`)
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::unavailable(BACKEND, e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::unavailable(BACKEND, e))?;

        Ok(Self::new(conn))
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| CacheError::unavailable(BACKEND, e))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        // PX rejects 0, and a sub-millisecond TTL would round down to it
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        let mut conn = self.conn.clone();
        conn.pset_ex::<_, _, ()>(key, value, millis)
            .await
            .map_err(|e| CacheError::unavailable(BACKEND, e))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::unavailable(BACKEND, e))
    }
}
