//! Cache representation of an order
//!
//! Orders are cached as their JSON document (the same camelCase shape the
//! HTTP API returns). Keys follow the fixed `order_<uuid>` scheme so external
//! cache inspection tools can find entries.

use crate::core::error::CodecError;
use crate::core::order::Order;
use uuid::Uuid;

/// Prefix of every order key in the cache
pub const CACHE_KEY_PREFIX: &str = "order_";

/// Cache key for an order: `order_` followed by the hyphenated lowercase UUID
pub fn cache_key(id: &Uuid) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, id)
}

/// Encode an order to cache bytes
pub fn encode(order: &Order) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(order).map_err(CodecError::Encode)
}

/// Decode cache bytes back into an order
///
/// Fails on corrupted bytes and on documents written with an incompatible
/// shape.
pub fn decode(bytes: &[u8]) -> Result<Order, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
