//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis;

pub use in_memory::{InMemoryCacheStore, InMemoryOrderStore};
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrderStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisCacheStore;
