//! Core module containing the order model, store traits, codec and errors

pub mod codec;
pub mod error;
pub mod order;
pub mod service;
pub mod validation;

pub use error::{CacheError, CodecError, OrdersError, OrdersResult, PersistenceError};
pub use order::{Amount, CreateOrderRequest, DecimalAmount, NewOrder, Order};
pub use service::{CacheStore, OrderStore};
