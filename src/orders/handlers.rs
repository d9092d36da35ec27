//! HTTP handlers for order operations
//!
//! Handlers only translate between HTTP and coordinator calls; payload
//! validation happens in the [`ValidatedJson`] extractor and every error is
//! rendered by `OrdersError`'s `IntoResponse`.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::core::error::{OrdersResult, RequestError};
use crate::core::order::{CreateOrderRequest, Order};
use crate::core::validation::ValidatedJson;
use crate::orders::coordinator::CacheAsideCoordinator;

/// Base path of the orders resource
pub const ORDERS_PATH: &str = "/api/orders";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orders: CacheAsideCoordinator,
}

impl AppState {
    pub fn new(orders: CacheAsideCoordinator) -> Self {
        Self { orders }
    }
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> OrdersResult<Response> {
    let order = state.orders.create(payload.into_new_order()?).await?;
    let location = format!("{}/{}", ORDERS_PATH, order.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(order)).into_response())
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> OrdersResult<Json<Order>> {
    let id = parse_order_id(&id)?;
    let order = state.orders.get_by_id(&id).await?;
    Ok(Json(order))
}

/// GET /api/orders
pub async fn list_orders(State(state): State<AppState>) -> OrdersResult<Json<Vec<Order>>> {
    let orders = state.orders.get_all().await?;
    Ok(Json(orders))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> OrdersResult<StatusCode> {
    let id = parse_order_id(&id)?;
    state.orders.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_order_id(raw: &str) -> Result<Uuid, RequestError> {
    Uuid::parse_str(raw).map_err(|_| RequestError::InvalidUuid {
        value: raw.to_string(),
    })
}
