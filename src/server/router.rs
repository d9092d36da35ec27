//! Router builder utilities for order routes

use crate::orders::handlers::{
    AppState, ORDERS_PATH, create_order, delete_order, get_order, list_orders,
};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// Build order routes
///
/// - GET /api/orders - List orders, most recent first
/// - POST /api/orders - Create an order
/// - GET /api/orders/{id} - Get an order (served from cache when possible)
/// - DELETE /api/orders/{id} - Delete an order and invalidate its cache entry
pub fn build_order_routes(state: AppState) -> Router {
    Router::new()
        .route(ORDERS_PATH, get(list_orders).post(create_order))
        .route(
            &format!("{}/{{id}}", ORDERS_PATH),
            get(get_order).delete(delete_order),
        )
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "orders-cache"
    }))
}
