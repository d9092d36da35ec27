//! Server module for building the orders HTTP server
//!
//! This module provides a `ServerBuilder` that wires the record store and the
//! cache into a cache-aside coordinator and registers:
//! - Order CRUD routes under `/api/orders`
//! - Health routes

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::{build_order_routes, health_routes};
