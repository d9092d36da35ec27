//! Order management module
//!
//! This module provides the cache-aside coordinator and the HTTP handlers
//! built on top of it.

pub mod coordinator;
pub mod handlers;

pub use coordinator::{CacheAsideCoordinator, CacheStatsSnapshot, DEFAULT_CACHE_TTL};
pub use handlers::{AppState, create_order, delete_order, get_order, list_orders};
